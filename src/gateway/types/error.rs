//! API error type shared by all handlers

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::response::{ApiResponse, error_codes};
use crate::query::QueryError;
use crate::transfer::TransferError;

/// Handler result: success envelope or [`ApiError`]
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Wrap data in a 200 success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// HTTP status plus envelope code and message
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::error(self.code, self.msg))).into_response()
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        let code = match &e {
            TransferError::SameWallet => error_codes::SAME_WALLET,
            TransferError::InvalidAmount(_) => error_codes::INVALID_AMOUNT,
            TransferError::SenderWalletNotFound(_) => error_codes::SENDER_WALLET_NOT_FOUND,
            TransferError::RecipientWalletNotFound(_) => error_codes::RECIPIENT_WALLET_NOT_FOUND,
            TransferError::DeadlineExceeded(_) => error_codes::DEADLINE_EXCEEDED,
            TransferError::Conflict(_) => error_codes::CONFLICT,
            // Store internals stay in the logs
            TransferError::Store(_) => return Self::internal("internal error"),
        };
        Self::new(status_from(e.http_status()), code, e.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        let code = match &e {
            QueryError::InvalidCount(_) => error_codes::INVALID_COUNT,
            QueryError::WalletNotFound(_) => error_codes::WALLET_NOT_FOUND,
            QueryError::Store(_) => return Self::internal("internal error"),
        };
        Self::new(status_from(e.http_status()), code, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        match e {
            JsonRejection::MissingJsonContentType(_) => Self::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                error_codes::UNSUPPORTED_MEDIA_TYPE,
                "Only application/json content type is accepted",
            ),
            other => Self::bad_request(other.body_text()),
        }
    }
}
