//! Ledger entry types
//!
//! Status strings match the `transactions.status` TEXT column.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core_types::MinorUnits;
use crate::wallet::WalletId;

/// Outcome messages written to `transactions.message`
pub mod messages {
    pub const SENDER_NOT_HAVE_ENOUGH_BALANCE: &str = "Sender does not have enough balance";
    pub const TRANSACTION_COMPLETED: &str = "Transaction completed";
    pub const TRANSACTION_PENDING: &str = "Transaction pending";
    pub const TRANSACTION_FAILED: &str = "Transaction failed";
}

/// Ledger entry identifier - UUID v4 assigned by the transfer engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new unique TransactionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger entry lifecycle
///
/// ```text
/// PENDING ──(insufficient funds)──▶ FAILED
///    └──────(debit + credit ok)───▶ COMPLETED
/// ```
///
/// Terminal states: COMPLETED, FAILED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Failed)
    }

    /// Only `pending -> terminal` is allowed
    #[inline]
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        *self == TransactionStatus::Pending && next.is_terminal()
    }

    /// Get the stored status string
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(format!("Invalid transaction status: {}", other)),
        }
    }
}

/// One recorded transfer attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub from: WalletId,
    pub to: WalletId,
    pub amount: MinorUnits,
    pub status: TransactionStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a fresh PENDING entry with a new id and the current time
    ///
    /// The timestamp is truncated to microseconds, the resolution of
    /// `TIMESTAMPTZ`, so the returned entry equals the stored row.
    pub fn pending(from: WalletId, to: WalletId, amount: MinorUnits) -> Self {
        Self {
            id: TransactionId::new(),
            from,
            to,
            amount,
            status: TransactionStatus::Pending,
            message: messages::TRANSACTION_PENDING.to_string(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// Newest first; ties on `created_at` broken by id so the order is total
pub fn sort_newest_first(entries: &mut [Transaction]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
