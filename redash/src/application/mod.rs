//! Application layer: the Redash API client
//!
//! This layer orchestrates domain logic and depends on the HTTP transport trait.

pub mod client;
pub mod error;
pub mod error_ext;

pub use client::RedashClient;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::TransportResultExt;
