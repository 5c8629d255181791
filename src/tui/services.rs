use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::backend::BackendClient;

use super::events::AppEvent;

/// Centralized handle to backend services.
///
/// Created once at startup, then passed by reference to views that need
/// backend access. Both fields are cheap clones, so spawned dispatch tasks
/// carry their own copies.
pub struct Services {
    pub backend: BackendClient,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize services from config.
    pub fn init(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let backend = BackendClient::new(&config.backend.base_url);
        log::info!("Backend client initialized for {}", backend.base_url());

        Self { backend, event_tx }
    }
}
