//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add transport setup concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("cannot create HTTP client: {message}")]
    HttpClient { message: String },
}

impl From<reqwest::Error> for InfraError {
    fn from(e: reqwest::Error) -> Self {
        Self::HttpClient {
            message: e.to_string(),
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
