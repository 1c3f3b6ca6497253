//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::validator::Status;

/// Errors raised by the decision tree engine.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("parse error at byte {offset}: {reason}")]
    Parse { offset: usize, reason: String },

    #[error("tree is structurally invalid: {0}")]
    StructuralInvalid(Status),

    #[error("not found: {0}")]
    NotFound(String),
}

impl TreeError {
    pub(crate) fn parse(offset: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
