//! HTTP handlers
//!
//! Extractor rejections are taken as `Result` so malformed input is answered
//! with the unified envelope instead of axum's plain-text body.

mod health;
mod query;
mod transfer;

pub use health::health_check;
pub use query::{get_wallet_balance, list_transactions};
pub use transfer::create_transfer;

use std::future::Future;
use std::time::Duration;

use super::types::ApiError;

/// Run a read under the request deadline
async fn bounded<T, E>(timeout: Duration, fut: impl Future<Output = Result<T, E>>) -> Result<T, ApiError>
where
    ApiError: From<E>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Request deadline exceeded");
            Err(ApiError::service_unavailable("request deadline exceeded"))
        }
    }
}
