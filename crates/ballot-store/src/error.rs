/// Errors from set backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached (connection refused, dropped, timed out).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with an error or an unexpected reply.
    #[error("backend error: {0}")]
    Backend(String),

    /// An in-process lock guarding backend state was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the failure is a transport problem a caller may retry.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result alias for backend operations.
pub type StoreResult<T> = Result<T, StoreError>;
