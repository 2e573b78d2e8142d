//! Query Error Types

use thiserror::Error;

use crate::store::StoreError;
use crate::wallet::WalletId;

#[derive(Error, Debug, Clone)]
pub enum QueryError {
    #[error("Count must be at least 1, got {0}")]
    InvalidCount(i64),

    #[error("Wallet not found: {0}")]
    WalletNotFound(WalletId),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl QueryError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidCount(_) => "INVALID_COUNT",
            QueryError::WalletNotFound(_) => "WALLET_NOT_FOUND",
            QueryError::Store(_) => "SYSTEM_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            QueryError::InvalidCount(_) => 400,
            QueryError::WalletNotFound(_) => 404,
            QueryError::Store(_) => 500,
        }
    }
}

impl From<StoreError> for QueryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::WalletNotFound(id) => QueryError::WalletNotFound(id),
            other => QueryError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let id = WalletId::new();
        let err: QueryError = StoreError::WalletNotFound(id).into();
        assert!(matches!(err, QueryError::WalletNotFound(w) if w == id));
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.code(), "WALLET_NOT_FOUND");
    }

    #[test]
    fn test_other_store_errors_are_system_errors() {
        let err: QueryError = StoreError::Database("connection reset".into()).into();
        assert_eq!(err.code(), "SYSTEM_ERROR");
        assert_eq!(err.http_status(), 500);
        assert_eq!(QueryError::InvalidCount(0).http_status(), 400);
    }
}
