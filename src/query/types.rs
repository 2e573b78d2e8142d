//! Query response shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core_types::MinorUnits;
use crate::ledger::{Transaction, TransactionId, TransactionStatus};
use crate::wallet::{Wallet, WalletId};

/// Ledger entry as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: TransactionId,
    pub from: WalletId,
    pub to: WalletId,
    pub amount: MinorUnits,
    pub status: TransactionStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            from: tx.from,
            to: tx.to,
            amount: tx.amount,
            status: tx.status,
            message: tx.message,
            created_at: tx.created_at,
        }
    }
}

/// Wallet balance as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletResponse {
    pub id: WalletId,
    pub balance: MinorUnits,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            id: wallet.id,
            balance: wallet.balance,
        }
    }
}
