use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::SetKind;

/// Direction of a single vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// The other direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Voteable-side set holding the voters who voted this way.
    pub fn voters_set(self) -> SetKind {
        match self {
            Self::Up => SetKind::UpVoters,
            Self::Down => SetKind::DownVoters,
        }
    }

    /// Voter-side set holding the voteables voted this way.
    pub fn votes_set(self) -> SetKind {
        match self {
            Self::Up => SetKind::UpVotes,
            Self::Down => SetKind::DownVotes,
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// The relation between one voter and one voteable.
///
/// Never stored directly: it is derived from membership in the voteable's
/// up/down voter sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteRelation {
    #[default]
    None,
    Up,
    Down,
}

impl VoteRelation {
    /// The direction voted, if any.
    pub fn direction(self) -> Option<VoteDirection> {
        match self {
            Self::None => None,
            Self::Up => Some(VoteDirection::Up),
            Self::Down => Some(VoteDirection::Down),
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl From<VoteDirection> for VoteRelation {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => Self::Up,
            VoteDirection::Down => Self::Down,
        }
    }
}

impl From<Option<VoteDirection>> for VoteRelation {
    fn from(direction: Option<VoteDirection>) -> Self {
        direction.map_or(Self::None, Self::from)
    }
}

impl fmt::Display for VoteRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}
