//! Application state for the web layer.

use std::sync::Arc;

use crate::fetch::StopConfig;
use crate::service::StopTimeService;
use crate::soap::SoapTransport;

/// Shared application state.
pub struct AppState<T> {
    /// Stop-time service for the configured stop
    pub service: Arc<StopTimeService<T>>,
}

impl<T: SoapTransport> AppState<T> {
    /// Create a new app state.
    pub fn new(transport: T, config: StopConfig) -> Self {
        Self {
            service: Arc::new(StopTimeService::new(transport, config)),
        }
    }
}

// Manual impl: the transport itself need not be `Clone`.
impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}
