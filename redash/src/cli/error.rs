//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0} is not valid command")]
    UnknownCommand(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("cannot render result: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnknownCommand(_) => crate::exitcode::FAILURE,
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Output(_) => crate::exitcode::SOFTWARE,
            CliError::Infra(e) => match e {
                InfraError::HttpClient { .. } => crate::exitcode::SOFTWARE,
                InfraError::Application(e) => match e {
                    ApplicationError::Domain(DomainError::MissingParameter(_))
                    | ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(DomainError::ResourceNotFound { .. }) => {
                        crate::exitcode::NOINPUT
                    }
                    ApplicationError::ErrorResponse { .. } | ApplicationError::Transport { .. } => {
                        crate::exitcode::UNAVAILABLE
                    }
                    ApplicationError::Decode { .. } => crate::exitcode::DATAERR,
                },
            },
        }
    }
}
