//! Transfer handler

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};
use crate::query::TransactionResponse;
use crate::transfer::TransferRequest;

/// POST /api/send
///
/// Body `{from, to, amount}`. A transfer refused for insufficient balance is
/// still a 200 carrying the FAILED ledger entry. A body sent without a JSON
/// content type is answered with 415, any other malformed body with 400.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<TransactionResponse> {
    let Json(req) = payload.map_err(ApiError::from)?;

    match state.engine.create_transfer(req).await {
        Ok(tx) => ok(tx.into()),
        Err(e) => {
            if e.http_status() >= 500 {
                tracing::error!(error = %e, code = e.code(), "Transfer failed");
            } else {
                tracing::info!(error = %e, code = e.code(), "Transfer rejected");
            }
            ApiError::from(e).into_err()
        }
    }
}
