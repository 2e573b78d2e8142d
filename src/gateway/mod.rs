//! HTTP Gateway
//!
//! Thin axum layer over the transfer engine and query service.
//!
//! | Method | Path                               | Handler                       |
//! |--------|------------------------------------|-------------------------------|
//! | POST   | `/api/send`                        | [`handlers::create_transfer`] |
//! | GET    | `/api/transactions?count=N`        | [`handlers::list_transactions`] |
//! | GET    | `/api/wallet/{wallet_id}/balance`  | [`handlers::get_wallet_balance`] |
//! | GET    | `/api/health`                      | [`handlers::health_check`]    |

pub mod handlers;
pub mod state;
pub mod types;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use state::AppState;

/// Build the router with all API routes
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/send", post(handlers::create_transfer))
        .route("/transactions", get(handlers::list_transactions))
        .route("/wallet/{wallet_id}/balance", get(handlers::get_wallet_balance))
        .route("/health", get(handlers::health_check));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Start HTTP Gateway server
///
/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn run_server(
    config: &GatewayConfig,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(Arc::new(state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(%addr, error = %e, "Failed to bind gateway listener");
        e
    })?;

    tracing::info!(
        addr = %listener.local_addr()?,
        request_timeout_ms = config.request_timeout_ms,
        "Gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Resolve on Ctrl-C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
