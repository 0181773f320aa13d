//! Service container for dependency injection
//!
//! Wires resolved settings and the HTTP session into a client.

use std::sync::Arc;

use crate::application::RedashClient;
use crate::config::Settings;
use crate::infrastructure::traits::{HttpTransport, ReqwestTransport};
use crate::infrastructure::InfraResult;

/// Container holding the resolved settings and the shared HTTP session.
pub struct ServiceContainer {
    /// Resolved settings
    pub settings: Arc<Settings>,

    /// HTTP session abstraction
    pub transport: Arc<dyn HttpTransport>,
}

impl ServiceContainer {
    /// Create a new service container with the real reqwest session.
    ///
    /// Requests never time out.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let transport = ReqwestTransport::new(None)?;
        Ok(Self::with_deps(settings, Arc::new(transport)))
    }

    /// Create a service container with a custom transport (for testing).
    pub fn with_deps(settings: Settings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
        }
    }

    /// Build an API client bound to the configured host and key.
    pub fn client(&self) -> RedashClient {
        RedashClient::new(
            self.settings.service_url.clone(),
            self.settings.api_key.clone(),
            Arc::clone(&self.transport),
        )
    }
}
