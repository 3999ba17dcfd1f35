use std::sync::Arc;

use crate::error::StoreResult;

/// A mutating set command inside a [`SetBackend::transaction`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetOp {
    /// Add `member` to the set at `key`. Replies `true` iff newly inserted.
    Add { key: String, member: String },
    /// Remove `member` from the set at `key`. Replies `true` iff it was present.
    Remove { key: String, member: String },
}

impl SetOp {
    pub fn add(key: impl Into<String>, member: impl Into<String>) -> Self {
        Self::Add {
            key: key.into(),
            member: member.into(),
        }
    }

    pub fn remove(key: impl Into<String>, member: impl Into<String>) -> Self {
        Self::Remove {
            key: key.into(),
            member: member.into(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Add { key, .. } | Self::Remove { key, .. } => key,
        }
    }
}

/// Key-value store with string sets and atomic multi-command transactions.
///
/// All implementations must satisfy these invariants:
/// - A set key springs into existence on first add and is logically absent
///   once its last member is removed.
/// - [`transaction`](SetBackend::transaction) applies every op or none, in
///   order, and no other client observes an intermediate state.
/// - Errors are propagated verbatim, never retried or swallowed.
pub trait SetBackend: Send + Sync {
    /// Add `member` to the set at `key`. Returns `true` iff newly inserted.
    fn set_add(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Remove `member` from the set at `key`. Returns `true` iff it was present.
    fn set_remove(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Number of members in the set at `key` (0 if absent).
    fn set_cardinality(&self, key: &str) -> StoreResult<u64>;

    /// Whether `member` belongs to the set at `key`.
    fn set_is_member(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// All members of the set at `key`, sorted.
    fn set_members(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Apply `ops` atomically and return each op's reply, in order.
    fn transaction(&self, ops: &[SetOp]) -> StoreResult<Vec<bool>>;
}

impl<B: SetBackend + ?Sized> SetBackend for Arc<B> {
    fn set_add(&self, key: &str, member: &str) -> StoreResult<bool> {
        (**self).set_add(key, member)
    }

    fn set_remove(&self, key: &str, member: &str) -> StoreResult<bool> {
        (**self).set_remove(key, member)
    }

    fn set_cardinality(&self, key: &str) -> StoreResult<u64> {
        (**self).set_cardinality(key)
    }

    fn set_is_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        (**self).set_is_member(key, member)
    }

    fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        (**self).set_members(key)
    }

    fn transaction(&self, ops: &[SetOp]) -> StoreResult<Vec<bool>> {
        (**self).transaction(ops)
    }
}

impl<B: SetBackend + ?Sized> SetBackend for &B {
    fn set_add(&self, key: &str, member: &str) -> StoreResult<bool> {
        (**self).set_add(key, member)
    }

    fn set_remove(&self, key: &str, member: &str) -> StoreResult<bool> {
        (**self).set_remove(key, member)
    }

    fn set_cardinality(&self, key: &str) -> StoreResult<u64> {
        (**self).set_cardinality(key)
    }

    fn set_is_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        (**self).set_is_member(key, member)
    }

    fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        (**self).set_members(key)
    }

    fn transaction(&self, ops: &[SetOp]) -> StoreResult<Vec<bool>> {
        (**self).transaction(ops)
    }
}
