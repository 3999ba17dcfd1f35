//! Vote transition engine for Ballot.
//!
//! Tracks one directional relation (none, up, or down) per (voter, voteable)
//! pair as membership in four denormalized sets, and derives tallies,
//! percentages, and a Wilson-score confidence used for ranking.
//!
//! # Example
//!
//! ```
//! use ballot_engine::{VoteStore, VoteRelation};
//! use ballot_store::InMemorySetBackend;
//! use ballot_types::Identity;
//!
//! let store = VoteStore::new(InMemorySetBackend::new());
//! let alice = Identity::record("User", 1);
//! let post = Identity::record("Post", 42);
//!
//! store.cast_up(&alice, &post).unwrap();
//! assert_eq!(store.tally(&post).unwrap(), 1);
//! assert_eq!(store.relation(&alice, &post).unwrap(), VoteRelation::Up);
//! assert!(!store.cast_up_idempotent(&alice, &post).unwrap());
//! ```
//!
//! # Consistency
//!
//! Every cast and clear is exactly one atomic backend transaction touching
//! all four sets. The engine holds no locks of its own; two racing casts of
//! the same vote resolve at the backend, where at most one observes a new
//! insertion and is reported as applied.

pub mod aggregate;
pub mod confidence;
pub mod error;
pub mod outcome;
pub mod store;

pub use aggregate::VoteCounts;
pub use confidence::{confidence, ConfidenceBound, LIDSTONE_EPSILON, Z_85};
pub use error::{VoteError, VoteResult};
pub use outcome::{Transition, VoteOutcome};
pub use store::VoteStore;

// Re-export key types
pub use ballot_store::{SetBackend, StoreConfig, StoreError};
pub use ballot_types::{Identifiable, Identity, VoteDirection, VoteRelation, Voteable, Voter};
