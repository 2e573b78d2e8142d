//! Transfer store abstraction
//!
//! The transfer engine runs every transfer inside one [`UnitOfWork`]: an
//! all-or-nothing scope holding exclusive wallet row locks and staging
//! ledger writes. Committing makes everything durable at once; dropping an
//! uncommitted unit of work rolls everything back and releases the locks.
//!
//! # Backends
//!
//! - [`PgStore`]: PostgreSQL, `SERIALIZABLE` transaction + `SELECT ... FOR UPDATE`
//! - [`MemoryStore`]: in-process, per-wallet async mutexes, staged writes

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::core_types::MinorUnits;
use crate::ledger::{Transaction, TransactionId, TransactionStatus};
use crate::wallet::{Wallet, WalletId};

/// One atomic, serializable unit of work spanning wallets and ledger
#[async_trait]
pub trait UnitOfWork: Send {
    /// Acquire an exclusive lock on the wallet row and return its balance
    ///
    /// Blocks while another unit of work holds the row.
    async fn lock_wallet(&mut self, id: WalletId) -> Result<MinorUnits, StoreError>;

    /// Apply a signed delta to a wallet locked by this unit of work
    async fn adjust_balance(&mut self, id: WalletId, delta: MinorUnits) -> Result<(), StoreError>;

    /// Write a new ledger row in PENDING state
    async fn insert_pending(&mut self, entry: &Transaction) -> Result<(), StoreError>;

    /// Move a PENDING row to a terminal status
    async fn finalize(
        &mut self,
        id: TransactionId,
        status: TransactionStatus,
        message: &str,
    ) -> Result<(), StoreError>;

    /// Make all writes durable and release the locks
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Store handle shared by the transfer engine and the query service
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Open a new unit of work
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Unlocked point read of a wallet
    async fn get_wallet(&self, id: WalletId) -> Result<Wallet, StoreError>;

    /// Most recent `n` ledger entries, newest first; `n <= 0` yields nothing
    async fn list_recent(&self, n: i64) -> Result<Vec<Transaction>, StoreError>;

    /// All ledger entries, newest first
    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Check backend health
    async fn health_check(&self) -> Result<(), StoreError>;
}
