//! Read-path handlers

use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};
use super::bounded;
use crate::query::{TransactionResponse, WalletResponse};
use crate::wallet::WalletId;

/// Query string of `GET /api/transactions`
#[derive(Debug, Deserialize)]
pub struct TransactionsParams {
    pub count: Option<i64>,
}

/// GET /api/transactions?count=N
///
/// Most recent N entries, or all entries when `count` is absent.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TransactionsParams>, QueryRejection>,
) -> ApiResult<Vec<TransactionResponse>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let entries = match params.count {
        Some(count) => bounded(state.request_timeout, state.query.list_transactions(count)).await?,
        None => bounded(state.request_timeout, state.query.list_all_transactions()).await?,
    };
    ok(entries)
}

/// GET /api/wallet/{wallet_id}/balance
pub async fn get_wallet_balance(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<WalletResponse> {
    let Path(raw) = path.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id: WalletId = raw
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid wallet id: {}", raw)))?;

    let wallet = bounded(state.request_timeout, state.query.get_wallet(id)).await?;
    ok(wallet)
}
