//! Shared state handed to every handler

use std::sync::Arc;

use crate::config::AppConfig;
use crate::platform::ClientFactory;

/// Read-only after startup; cloning only bumps reference counts
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clients: Arc<dyn ClientFactory>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, clients: Arc<dyn ClientFactory>) -> Self {
        Self { config, clients }
    }
}
