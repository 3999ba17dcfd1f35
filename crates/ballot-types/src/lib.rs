//! Foundation types for Ballot.
//!
//! This crate provides the identity, direction, and key-layout types shared by
//! the storage backends and the vote engine. Every other Ballot crate depends
//! on `ballot-types`.
//!
//! # Key Types
//!
//! - [`Identity`] — Canonical `"<Kind>:<id>"` handle for a voter or voteable
//! - [`Voter`] / [`Voteable`] — Capabilities an entity opts into
//! - [`VoteDirection`] — `Up` or `Down`
//! - [`VoteRelation`] — Derived per-pair state: `None`, `Up`, or `Down`
//! - [`KeyCodec`] — Builds namespaced set keys from identities

pub mod error;
pub mod identity;
pub mod keys;
pub mod vote;

pub use error::TypeError;
pub use identity::{Identifiable, Identity, Voteable, Voter};
pub use keys::{KeyCodec, SetKind, DEFAULT_KEY_PREFIX};
pub use vote::{VoteDirection, VoteRelation};
