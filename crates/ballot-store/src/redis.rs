//! Redis-backed [`SetBackend`].
//!
//! Each set lives under its own Redis key. Transactions are sent as a single
//! `MULTI`/`EXEC` pipeline, so Redis applies the whole batch atomically.

use std::sync::{Mutex, MutexGuard};

use redis::{Commands, Connection};
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::{SetBackend, SetOp};

/// Redis set backend over one externally configured connection.
///
/// The connection is used as-is: it is never pooled, retried, or reopened.
/// Commands from concurrent callers are serialized on the connection.
pub struct RedisSetBackend {
    conn: Mutex<Connection>,
}

impl RedisSetBackend {
    /// Open a connection using `config`.
    pub fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = redis::Client::open(config.connection_url())?;
        let conn = match config.connect_timeout() {
            Some(timeout) => client.get_connection_with_timeout(timeout)?,
            None => client.get_connection()?,
        };
        info!(host = %config.host, port = config.port, db = config.db, "redis backend connected");
        Ok(Self::from_connection(conn))
    }

    /// Wrap a connection the host application already owns.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        let transport = e.kind() == redis::ErrorKind::IoError
            || e.is_io_error()
            || e.is_connection_refusal()
            || e.is_connection_dropped()
            || e.is_timeout();
        if transport {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

impl SetBackend for RedisSetBackend {
    fn set_add(&self, key: &str, member: &str) -> StoreResult<bool> {
        let added: i64 = self.conn()?.sadd(key, member)?;
        Ok(added > 0)
    }

    fn set_remove(&self, key: &str, member: &str) -> StoreResult<bool> {
        let removed: i64 = self.conn()?.srem(key, member)?;
        Ok(removed > 0)
    }

    fn set_cardinality(&self, key: &str) -> StoreResult<u64> {
        Ok(self.conn()?.scard(key)?)
    }

    fn set_is_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        Ok(self.conn()?.sismember(key, member)?)
    }

    fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut members: Vec<String> = self.conn()?.smembers(key)?;
        members.sort();
        Ok(members)
    }

    fn transaction(&self, ops: &[SetOp]) -> StoreResult<Vec<bool>> {
        if ops.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in ops {
            match op {
                SetOp::Add { key, member } => pipe.sadd(key, member),
                SetOp::Remove { key, member } => pipe.srem(key, member),
            };
        }
        let replies: Vec<i64> = pipe.query(&mut *self.conn()?)?;
        decode_replies(replies, ops.len())
    }
}

/// `SADD`/`SREM` integer replies to "changed" flags, one per command.
fn decode_replies(replies: Vec<i64>, expected: usize) -> StoreResult<Vec<bool>> {
    if replies.len() != expected {
        return Err(StoreError::Backend(format!(
            "transaction returned {} replies for {} commands",
            replies.len(),
            expected
        )));
    }
    Ok(replies.into_iter().map(|n| n > 0).collect())
}

impl std::fmt::Debug for RedisSetBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSetBackend").finish_non_exhaustive()
    }
}
