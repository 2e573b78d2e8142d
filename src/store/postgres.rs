//! PostgreSQL store
//!
//! Each unit of work is a `SERIALIZABLE` transaction. Wallet rows are locked
//! with `SELECT ... FOR UPDATE`; sqlx rolls the transaction back when an
//! uncommitted [`PgUnitOfWork`] is dropped (error, timeout, cancellation).

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction as PgTransaction};

use super::{StoreError, TransferStore, UnitOfWork};
use crate::core_types::MinorUnits;
use crate::db::Database;
use crate::ledger::{LedgerRepository, Transaction, TransactionId, TransactionStatus};
use crate::wallet::{Wallet, WalletId, WalletRepository};

/// Postgres-backed transfer store
pub struct PgStore {
    db: Arc<Database>,
}

impl PgStore {
    /// Create a new PgStore over an owned database handle
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

#[async_trait]
impl TransferStore for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let mut tx = self.db.pool().begin().await?;

        // Must be the first statement of the transaction
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgUnitOfWork {
            tx,
            locked: HashSet::new(),
        }))
    }

    async fn get_wallet(&self, id: WalletId) -> Result<Wallet, StoreError> {
        WalletRepository::get_by_id(self.db.pool(), id)
            .await?
            .ok_or(StoreError::WalletNotFound(id))
    }

    async fn list_recent(&self, n: i64) -> Result<Vec<Transaction>, StoreError> {
        LedgerRepository::list_recent(self.db.pool(), n).await
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        LedgerRepository::list_all(self.db.pool()).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(self.db.health_check().await?)
    }
}

/// Unit of work over one Postgres transaction
pub struct PgUnitOfWork {
    tx: PgTransaction<'static, Postgres>,
    /// Wallets locked `FOR UPDATE` in this transaction
    locked: HashSet<WalletId>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_wallet(&mut self, id: WalletId) -> Result<MinorUnits, StoreError> {
        let balance = WalletRepository::lock_balance(&mut *self.tx, id)
            .await?
            .ok_or(StoreError::WalletNotFound(id))?;

        self.locked.insert(id);
        Ok(balance)
    }

    async fn adjust_balance(&mut self, id: WalletId, delta: MinorUnits) -> Result<(), StoreError> {
        if !self.locked.contains(&id) {
            return Err(StoreError::WalletNotLocked(id));
        }

        let new_balance = WalletRepository::apply_delta(&mut *self.tx, id, delta)
            .await
            .map_err(|e| StoreError::from_balance_write(e, id))?
            .ok_or(StoreError::WalletNotFound(id))?;

        tracing::debug!(wallet = %id, delta, new_balance, "Balance adjusted");
        Ok(())
    }

    async fn insert_pending(&mut self, entry: &Transaction) -> Result<(), StoreError> {
        debug_assert_eq!(entry.status, TransactionStatus::Pending);
        LedgerRepository::insert(&mut *self.tx, entry).await?;
        Ok(())
    }

    async fn finalize(
        &mut self,
        id: TransactionId,
        status: TransactionStatus,
        message: &str,
    ) -> Result<(), StoreError> {
        let updated =
            LedgerRepository::finalize_if_pending(&mut *self.tx, id, status, message).await?;
        if updated {
            return Ok(());
        }

        // CAS missed: tell "missing" apart from "already terminal"
        match LedgerRepository::get_status(&mut *self.tx, id).await? {
            Some(current) => Err(StoreError::InvalidStatusTransition {
                id,
                from: current,
                to: status,
            }),
            None => Err(StoreError::TransactionNotFound(id)),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
