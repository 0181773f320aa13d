//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::traits::HttpMethod;

/// Application errors wrap domain errors and add request-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Any non-success status other than 404.
    #[error("[status:{status}]: {method} /api/{uri} failed")]
    ErrorResponse {
        status: u16,
        method: HttpMethod,
        uri: String,
    },

    #[error("request failed: {context}")]
    Transport {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid response: {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// True for the "referenced entity is absent" case.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(DomainError::ResourceNotFound { .. })
        )
    }

    /// Status code carried by an error response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApplicationError::ErrorResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
