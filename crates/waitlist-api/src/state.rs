//! # Application State
//!
//! Shared state handed to every handler. Cheap to clone: the gateway holds
//! an `Arc` to the store and the metrics hold an `Arc` to their registry.

use std::sync::Arc;

use waitlist_store::{MemoryStore, WaitlistStore};

use crate::gateway::SubmissionGateway;
use crate::middleware::metrics::ApiMetrics;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Mount `/metrics` and the request metrics middleware.
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `WAITLIST_METRICS_ENABLED`.
    ///
    /// An unparseable port falls back to [`DEFAULT_PORT`]; metrics stay on
    /// unless the variable is literally `false`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let metrics_enabled = std::env::var("WAITLIST_METRICS_ENABLED")
            .map(|v| v.trim().to_lowercase() != "false")
            .unwrap_or(true);
        Self {
            port,
            metrics_enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: SubmissionGateway,
    pub metrics: ApiMetrics,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn WaitlistStore>, config: AppConfig) -> Result<Self, prometheus::Error> {
        Ok(Self {
            gateway: SubmissionGateway::new(store),
            metrics: ApiMetrics::new()?,
            config,
        })
    }

    /// State over a fresh [`MemoryStore`] with default configuration.
    pub fn in_memory() -> Result<Self, prometheus::Error> {
        Self::new(Arc::new(MemoryStore::new()), AppConfig::default())
    }

    pub fn store(&self) -> &Arc<dyn WaitlistStore> {
        self.gateway.store()
    }
}
