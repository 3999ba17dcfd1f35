//! Set-membership storage for Ballot.
//!
//! The vote engine keeps four denormalized sets per (voter, voteable) pair
//! and relies on the backend for exactly two things: per-command set
//! semantics and an all-or-nothing multi-command transaction.
//!
//! # Storage Backends
//!
//! All backends implement the [`SetBackend`] trait:
//!
//! - [`InMemorySetBackend`] -- `HashMap`-based store for tests and embedding
//! - `RedisSetBackend` -- Redis sets with `MULTI`/`EXEC` (feature `redis`)
//!
//! # Design Rules
//!
//! 1. A transaction is applied completely or not at all; no other client
//!    observes a partial batch.
//! 2. Empty sets are logically absent: cardinality 0, no members.
//! 3. Backends never retry or reconnect. All errors are propagated.

pub mod config;
pub mod error;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::InMemorySetBackend;
#[cfg(feature = "redis")]
pub use self::redis::RedisSetBackend;
pub use traits::{SetBackend, SetOp};
