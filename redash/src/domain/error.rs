//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent lookups and inputs that cannot be satisfied.
/// These are independent of transport concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A referenced query id or data source name does not exist.
    #[error("{resource} is not found")]
    ResourceNotFound { resource: String },

    #[error("parameter error: {0} is required")]
    MissingParameter(&'static str),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource: resource.into(),
        }
    }
}
