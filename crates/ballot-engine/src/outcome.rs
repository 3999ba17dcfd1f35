use ballot_types::{VoteDirection, VoteRelation};
use serde::{Deserialize, Serialize};

use crate::error::{VoteError, VoteResult};

/// A relation change committed by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: VoteRelation,
    pub to: VoteRelation,
}

impl Transition {
    /// `Up -> Down` or `Down -> Up`.
    pub fn is_switch(&self) -> bool {
        !self.from.is_none() && !self.to.is_none()
    }
}

/// Result of a cast or clear transaction.
///
/// Non-applied outcomes still mean the transaction committed: a cast always
/// removes any stale opposite vote, and a clear always removes the voter-side
/// entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    Applied(Transition),
    /// The voter already held this vote.
    AlreadyVoted(VoteDirection),
    /// There was no vote to clear.
    NotVoted,
}

impl VoteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn transition(&self) -> Option<Transition> {
        match self {
            Self::Applied(t) => Some(*t),
            _ => None,
        }
    }

    /// Strict form: anything but `Applied` becomes an error.
    pub fn into_result(self) -> VoteResult<Transition> {
        match self {
            Self::Applied(t) => Ok(t),
            Self::AlreadyVoted(direction) => Err(VoteError::AlreadyVoted(direction)),
            Self::NotVoted => Err(VoteError::NotVoted),
        }
    }
}
