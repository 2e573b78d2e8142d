//! Query Service implementation

use std::sync::Arc;

use tracing::debug;

use super::error::QueryError;
use super::types::{TransactionResponse, WalletResponse};
use crate::store::TransferStore;
use crate::wallet::WalletId;

/// Read-only view over the ledger and wallet balances
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn TransferStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn TransferStore>) -> Self {
        Self { store }
    }

    /// Most recent `count` ledger entries, newest first
    pub async fn list_transactions(
        &self,
        count: i64,
    ) -> Result<Vec<TransactionResponse>, QueryError> {
        if count < 1 {
            return Err(QueryError::InvalidCount(count));
        }
        let entries = self.store.list_recent(count).await?;
        debug!(count, returned = entries.len(), "Listed recent transactions");
        Ok(entries.into_iter().map(TransactionResponse::from).collect())
    }

    /// Every ledger entry, newest first
    pub async fn list_all_transactions(&self) -> Result<Vec<TransactionResponse>, QueryError> {
        let entries = self.store.list_all().await?;
        Ok(entries.into_iter().map(TransactionResponse::from).collect())
    }

    /// Committed balance of one wallet
    pub async fn get_wallet(&self, id: WalletId) -> Result<WalletResponse, QueryError> {
        Ok(self.store.get_wallet(id).await?.into())
    }
}
