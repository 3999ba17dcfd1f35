//! Storage key layout.
//!
//! Each identity owns up to four sets in the backing store:
//!
//! ```text
//! <prefix><Kind>:<id>:up_voters   voters who up-voted this voteable
//! <prefix><Kind>:<id>:dn_voters   voters who down-voted this voteable
//! <prefix><Kind>:<id>:up_votes    voteables this voter up-voted
//! <prefix><Kind>:<id>:dn_votes    voteables this voter down-voted
//! ```

use std::fmt;

use crate::identity::Identity;

/// Namespace applied to every key when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "vote:";

/// One of the four per-identity sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetKind {
    UpVoters,
    DownVoters,
    UpVotes,
    DownVotes,
}

impl SetKind {
    /// Suffix token appended to the identity.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::UpVoters => "up_voters",
            Self::DownVoters => "dn_voters",
            Self::UpVotes => "up_votes",
            Self::DownVotes => "dn_votes",
        }
    }
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Builds namespaced set keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCodec {
    prefix: String,
}

impl KeyCodec {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `<prefix><identity>:<suffix>`
    pub fn key(&self, identity: &Identity, set: SetKind) -> String {
        format!("{}{identity}:{}", self.prefix, set.suffix())
    }
}

impl Default for KeyCodec {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}
