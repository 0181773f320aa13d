//! Error conversion helpers for transport and decode failures
//!
//! Provides extension traits for cleaner error handling with request context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::HttpMethod;

/// Extension trait for converting transport results to `ApplicationResult` with context.
pub trait TransportResultExt<T> {
    /// Add method and path context to a failure.
    ///
    /// # Example
    /// ```ignore
    /// self.transport.send(&request)
    ///     .with_request_context(HttpMethod::Get, "data_sources")?;
    /// ```
    fn with_request_context(self, method: HttpMethod, uri: &str) -> ApplicationResult<T>;
}

impl<T> TransportResultExt<T> for io::Result<T> {
    fn with_request_context(self, method: HttpMethod, uri: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Transport {
            context: format!("{} /api/{}", method, uri),
            source: e,
        })
    }
}

impl<T> TransportResultExt<T> for serde_json::Result<T> {
    fn with_request_context(self, method: HttpMethod, uri: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Decode {
            context: format!("{} /api/{}", method, uri),
            source: e,
        })
    }
}
