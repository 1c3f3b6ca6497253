//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        CliError::Application(ApplicationError::Tree(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

fn tree_exit_code(e: &TreeError) -> i32 {
    match e {
        TreeError::OutOfMemory(_) => crate::exitcode::OSERR,
        TreeError::Parse { .. }
        | TreeError::StructuralInvalid(_)
        | TreeError::NotFound(_)
        | TreeError::InvalidArgument(_) => crate::exitcode::DATAERR,
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Tree(tree) => tree_exit_code(tree),
                ApplicationError::Load { source, .. } => tree_exit_code(source),
                ApplicationError::Io { source, .. }
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    crate::exitcode::NOINPUT
                }
                ApplicationError::Io { .. } | ApplicationError::Aborted => crate::exitcode::IOERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
