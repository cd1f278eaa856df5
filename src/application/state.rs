// src/application/state.rs

use std::sync::Arc;

use crate::application::error_boundary::ErrorBoundary;
use crate::config::ClientConfig;
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::compression::{CompressionTransport, HttpCompressionClient};
use crate::services::SessionController;

/// Application state shared by every command.
/// All fields are Arc-wrapped for sharing across tasks.
pub struct AppState {
    pub config: ClientConfig,
    pub event_bus: Arc<EventBus>,
    pub session_controller: Arc<SessionController>,
    pub error_boundary: Arc<ErrorBoundary>,
}

impl AppState {
    /// Wire the services around an existing transport
    pub fn new(config: ClientConfig, transport: Arc<dyn CompressionTransport>) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let session_controller = Arc::new(SessionController::new(
            &config,
            transport,
            Arc::clone(&event_bus),
        ));
        let error_boundary = Arc::new(ErrorBoundary::new(Arc::clone(
            session_controller.notifications(),
        )));

        Self {
            config,
            event_bus,
            session_controller,
            error_boundary,
        }
    }

    /// Wire the services around the HTTP client for `config`
    pub fn from_config(config: ClientConfig) -> AppResult<Self> {
        config.validate()?;
        let transport = Arc::new(HttpCompressionClient::new(&config)?);
        Ok(Self::new(config, transport))
    }
}
