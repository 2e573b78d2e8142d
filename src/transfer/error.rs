//! Transfer Error Types

use std::time::Duration;

use thiserror::Error;

use crate::core_types::MinorUnits;
use crate::store::StoreError;
use crate::wallet::WalletId;

/// Transfer error types
///
/// Insufficient balance is NOT an error: it is a committed FAILED ledger
/// entry returned as a normal result.
#[derive(Error, Debug, Clone)]
pub enum TransferError {
    // === Precondition Errors ===
    #[error("Sender and recipient wallet cannot be the same")]
    SameWallet,

    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(MinorUnits),

    // === Wallet Errors (no ledger row written) ===
    #[error("Sender wallet not found: {0}")]
    SenderWalletNotFound(WalletId),

    #[error("Recipient wallet not found: {0}")]
    RecipientWalletNotFound(WalletId),

    // === Retryable Errors ===
    #[error("Transfer deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Transfer conflicted with a concurrent transfer: {0}")]
    Conflict(String),

    // === System Errors ===
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::SameWallet => "SAME_WALLET",
            TransferError::InvalidAmount(_) => "INVALID_AMOUNT",
            TransferError::SenderWalletNotFound(_) => "SENDER_WALLET_NOT_FOUND",
            TransferError::RecipientWalletNotFound(_) => "RECIPIENT_WALLET_NOT_FOUND",
            TransferError::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
            TransferError::Conflict(_) => "CONFLICT",
            TransferError::Store(_) => "SYSTEM_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::SameWallet
            | TransferError::InvalidAmount(_)
            | TransferError::SenderWalletNotFound(_)
            | TransferError::RecipientWalletNotFound(_) => 400,
            TransferError::Conflict(_) => 409,
            TransferError::DeadlineExceeded(_) => 503,
            TransferError::Store(_) => 500,
        }
    }

    /// The caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransferError::DeadlineExceeded(_) | TransferError::Conflict(_)
        )
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => TransferError::Conflict(msg),
            other => TransferError::Store(other),
        }
    }
}
