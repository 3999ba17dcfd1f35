use ballot_types::{Identity, VoteDirection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("{0} does not accept votes")]
    InvalidVoteable(Identity),

    #[error("{0} cannot cast votes")]
    InvalidVoter(Identity),

    #[error("already voted {0}")]
    AlreadyVoted(VoteDirection),

    #[error("no vote to clear")]
    NotVoted,

    #[error("store error: {0}")]
    Store(#[from] ballot_store::StoreError),
}

impl VoteError {
    /// Whether the requested transition was simply a no-op on the current
    /// relation (`AlreadyVoted` or `NotVoted`).
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::AlreadyVoted(_) | Self::NotVoted)
    }
}

pub type VoteResult<T> = Result<T, VoteError>;
