use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{SetBackend, SetOp};

type Sets = HashMap<String, BTreeSet<String>>;

/// In-memory, HashMap-based set store.
///
/// Intended for tests and embedding. All sets live behind a single `RwLock`;
/// a transaction holds the write lock for its whole batch, which makes it
/// atomic with respect to every other reader and writer.
pub struct InMemorySetBackend {
    sets: RwLock<Sets>,
}

impl InMemorySetBackend {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
        }
    }

    /// Number of non-empty set keys.
    pub fn key_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns `true` if no set holds any member.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Sorted list of all non-empty set keys.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self.read()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Remove every set.
    pub fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Sets>> {
        self.sets
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Sets>> {
        self.sets
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

fn add(sets: &mut Sets, key: &str, member: &str) -> bool {
    sets.entry(key.to_string())
        .or_default()
        .insert(member.to_string())
}

fn remove(sets: &mut Sets, key: &str, member: &str) -> bool {
    let Some(set) = sets.get_mut(key) else {
        return false;
    };
    let removed = set.remove(member);
    if set.is_empty() {
        sets.remove(key);
    }
    removed
}

impl Default for InMemorySetBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SetBackend for InMemorySetBackend {
    fn set_add(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut sets = self.write()?;
        Ok(add(&mut sets, key, member))
    }

    fn set_remove(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut sets = self.write()?;
        Ok(remove(&mut sets, key, member))
    }

    fn set_cardinality(&self, key: &str) -> StoreResult<u64> {
        Ok(self.read()?.get(key).map_or(0, |set| set.len() as u64))
    }

    fn set_is_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        Ok(self
            .read()?
            .get(key)
            .is_some_and(|set| set.contains(member)))
    }

    fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .read()?
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn transaction(&self, ops: &[SetOp]) -> StoreResult<Vec<bool>> {
        let mut sets = self.write()?;
        let replies = ops
            .iter()
            .map(|op| match op {
                SetOp::Add { key, member } => add(&mut sets, key, member),
                SetOp::Remove { key, member } => remove(&mut sets, key, member),
            })
            .collect::<Vec<_>>();
        debug!(ops = ops.len(), ?replies, "set transaction applied");
        Ok(replies)
    }
}

impl std::fmt::Debug for InMemorySetBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.sets.read().map(|sets| sets.len()).unwrap_or_default();
        f.debug_struct("InMemorySetBackend")
            .field("key_count", &count)
            .finish()
    }
}
