use std::sync::Arc;
use std::time::Duration;

use crate::config::{GatewayConfig, TransferConfig};
use crate::query::QueryService;
use crate::store::TransferStore;
use crate::transfer::TransferEngine;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Transfer engine (sole writer)
    pub engine: Arc<TransferEngine>,
    /// Read path
    pub query: QueryService,
    /// Store handle for health checks
    pub store: Arc<dyn TransferStore>,
    /// Deadline applied to read requests
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TransferStore>,
        transfer: &TransferConfig,
        gateway: &GatewayConfig,
    ) -> Self {
        Self {
            engine: Arc::new(TransferEngine::new(store.clone(), transfer)),
            query: QueryService::new(store.clone()),
            store,
            request_timeout: gateway.request_timeout(),
        }
    }
}
