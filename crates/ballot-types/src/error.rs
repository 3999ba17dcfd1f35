use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("identity kind must not be empty")]
    EmptyKind,

    #[error("identity id must not be empty (kind {kind})")]
    EmptyId { kind: String },

    #[error("identity id must not contain ':': {id}")]
    SeparatorInId { id: String },

    #[error("malformed identity string: {0}")]
    Malformed(String),
}
