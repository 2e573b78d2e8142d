//! Health check handler

use std::sync::Arc;

use axum::extract::State;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, HealthResponse, ok};

/// GET /api/health
///
/// - Healthy: 200 OK + {code: 0, data: {store, revision, timestamp_ms}}
/// - Unhealthy: 503 Service Unavailable, no internal details exposed
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let ping = tokio::time::timeout(state.request_timeout, state.store.health_check()).await;
    match ping {
        Ok(Ok(())) => ok(HealthResponse {
            store: state.store.name().to_string(),
            revision: env!("BUILD_REVISION").to_string(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }),
        Ok(Err(e)) => {
            tracing::error!(store = state.store.name(), error = %e, "[HEALTH] Store ping failed");
            Err(ApiError::service_unavailable("unavailable"))
        }
        Err(_) => {
            tracing::error!(store = state.store.name(), "[HEALTH] Store ping timed out");
            Err(ApiError::service_unavailable("unavailable"))
        }
    }
}
