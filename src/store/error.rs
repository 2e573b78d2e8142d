//! Store Error Types

use thiserror::Error;

use crate::ledger::{TransactionId, TransactionStatus};
use crate::wallet::WalletId;

/// Postgres SQLSTATE codes the store maps to dedicated variants
pub mod sqlstate {
    pub const SERIALIZATION_FAILURE: &str = "40001";
    pub const DEADLOCK_DETECTED: &str = "40P01";
    pub const CHECK_VIOLATION: &str = "23514";
    pub const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";
}

/// Errors raised by wallet store and ledger backends
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Wallet not found: {0}")]
    WalletNotFound(WalletId),

    #[error("Wallet {0} was not locked in this unit of work")]
    WalletNotLocked(WalletId),

    #[error("Balance constraint violated for wallet {0}")]
    BalanceConstraint(WalletId),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Invalid status transition for {id}: {from} -> {to}")]
    InvalidStatusTransition {
        id: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus,
    },

    /// Serialization failure or deadlock reported by the database (retryable)
    #[error("Serialization conflict: {0}")]
    Conflict(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// SQLSTATE of a database error, if any
    pub fn sqlstate(e: &sqlx::Error) -> Option<String> {
        e.as_database_error()
            .and_then(|db| db.code())
            .map(|c| c.into_owned())
    }

    /// Map a failed balance write, attributing constraint violations to the wallet
    pub fn from_balance_write(e: sqlx::Error, wallet: WalletId) -> Self {
        match Self::sqlstate(&e).as_deref() {
            Some(sqlstate::CHECK_VIOLATION) | Some(sqlstate::NUMERIC_VALUE_OUT_OF_RANGE) => {
                StoreError::BalanceConstraint(wallet)
            }
            _ => e.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match Self::sqlstate(&e).as_deref() {
            Some(sqlstate::SERIALIZATION_FAILURE) | Some(sqlstate::DEADLOCK_DETECTED) => {
                StoreError::Conflict(e.to_string())
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}
