//! Transfer request types

use serde::{Deserialize, Serialize};

use super::error::TransferError;
use crate::core_types::MinorUnits;
use crate::wallet::WalletId;

/// A single wallet-to-wallet transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: WalletId,
    pub to: WalletId,
    /// Minor units, must be > 0
    pub amount: MinorUnits,
}

impl TransferRequest {
    pub fn new(from: WalletId, to: WalletId, amount: MinorUnits) -> Self {
        Self { from, to, amount }
    }

    /// Preconditions checked before any unit of work is opened
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.amount <= 0 {
            return Err(TransferError::InvalidAmount(self.amount));
        }
        if self.from == self.to {
            return Err(TransferError::SameWallet);
        }
        Ok(())
    }

    /// Wallets in canonical lock order (ascending id), independent of direction
    pub fn lock_order(&self) -> [WalletId; 2] {
        if self.from <= self.to {
            [self.from, self.to]
        } else {
            [self.to, self.from]
        }
    }
}
