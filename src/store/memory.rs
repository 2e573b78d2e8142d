//! In-memory store
//!
//! Used by tests and `--memory` mode. Mirrors the Postgres row locking and
//! rollback behaviour:
//! - row lock = `tokio::sync::Mutex` per wallet, held as an owned guard until
//!   the unit of work commits or is dropped
//! - balance changes and ledger writes are staged, applied only on commit
//! - unlocked reads see the last committed balance and never block
//!
//! Unlike `SERIALIZABLE` Postgres it never reports a serialization conflict,
//! so a waiter always proceeds once the lock is released.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{StoreError, TransferStore, UnitOfWork};
use crate::core_types::MinorUnits;
use crate::ledger::{Transaction, TransactionId, TransactionStatus, sort_newest_first};
use crate::wallet::{Wallet, WalletId};

/// One wallet row
struct WalletRow {
    lock: Arc<Mutex<()>>,
    /// Last committed balance; written only while `lock` is held
    balance: AtomicI64,
}

/// In-process transfer store
#[derive(Default)]
pub struct MemoryStore {
    wallets: Arc<DashMap<WalletId, Arc<WalletRow>>>,
    ledger: Arc<RwLock<Vec<Transaction>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given wallets
    pub fn with_wallets(wallets: impl IntoIterator<Item = Wallet>) -> Self {
        let store = Self::new();
        for wallet in wallets {
            store.insert_wallet(wallet);
        }
        store
    }

    /// Insert a seed wallet, leaving an existing row untouched
    ///
    /// Returns true if the row was created.
    pub fn insert_wallet(&self, wallet: Wallet) -> bool {
        let mut created = false;
        self.wallets.entry(wallet.id).or_insert_with(|| {
            created = true;
            Arc::new(WalletRow {
                lock: Arc::new(Mutex::new(())),
                balance: AtomicI64::new(wallet.balance),
            })
        });
        created
    }

    fn row(&self, id: WalletId) -> Option<Arc<WalletRow>> {
        self.wallets.get(&id).map(|r| r.value().clone())
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(MemoryUnitOfWork {
            wallets: self.wallets.clone(),
            ledger: self.ledger.clone(),
            locked: BTreeMap::new(),
            inserted: Vec::new(),
            finalized: HashMap::new(),
        }))
    }

    async fn get_wallet(&self, id: WalletId) -> Result<Wallet, StoreError> {
        let row = self.row(id).ok_or(StoreError::WalletNotFound(id))?;
        Ok(Wallet::new(id, row.balance.load(Ordering::Acquire)))
    }

    async fn list_recent(&self, n: i64) -> Result<Vec<Transaction>, StoreError> {
        if n <= 0 {
            return Ok(Vec::new());
        }
        let mut entries = self.list_all().await?;
        entries.truncate(usize::try_from(n).unwrap_or(usize::MAX));
        Ok(entries)
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut entries = self
            .ledger
            .read()
            .map_err(|_| StoreError::Database("ledger lock poisoned".to_string()))?
            .clone();
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A locked wallet and its working balance inside one unit of work
struct LockedWallet {
    row: Arc<WalletRow>,
    _guard: OwnedMutexGuard<()>,
    working: MinorUnits,
}

pub struct MemoryUnitOfWork {
    wallets: Arc<DashMap<WalletId, Arc<WalletRow>>>,
    ledger: Arc<RwLock<Vec<Transaction>>>,
    locked: BTreeMap<WalletId, LockedWallet>,
    /// Rows inserted by this unit of work
    inserted: Vec<Transaction>,
    /// Status updates to rows committed by earlier units of work
    finalized: HashMap<TransactionId, (TransactionStatus, String)>,
}

impl MemoryUnitOfWork {
    fn committed_status(&self, id: TransactionId) -> Result<Option<TransactionStatus>, StoreError> {
        let ledger = self
            .ledger
            .read()
            .map_err(|_| StoreError::Database("ledger lock poisoned".to_string()))?;
        Ok(ledger.iter().find(|t| t.id == id).map(|t| t.status))
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_wallet(&mut self, id: WalletId) -> Result<MinorUnits, StoreError> {
        if let Some(locked) = self.locked.get(&id) {
            return Ok(locked.working);
        }

        let row = self
            .wallets
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StoreError::WalletNotFound(id))?;

        let guard = row.lock.clone().lock_owned().await;
        let working = row.balance.load(Ordering::Acquire);

        self.locked.insert(
            id,
            LockedWallet {
                row,
                _guard: guard,
                working,
            },
        );
        Ok(working)
    }

    async fn adjust_balance(&mut self, id: WalletId, delta: MinorUnits) -> Result<(), StoreError> {
        let locked = self
            .locked
            .get_mut(&id)
            .ok_or(StoreError::WalletNotLocked(id))?;

        let new_balance = locked
            .working
            .checked_add(delta)
            .filter(|b| *b >= 0)
            .ok_or(StoreError::BalanceConstraint(id))?;

        locked.working = new_balance;
        tracing::debug!(wallet = %id, delta, new_balance, "Balance adjusted");
        Ok(())
    }

    async fn insert_pending(&mut self, entry: &Transaction) -> Result<(), StoreError> {
        debug_assert_eq!(entry.status, TransactionStatus::Pending);
        let duplicate = self.inserted.iter().any(|t| t.id == entry.id)
            || self.committed_status(entry.id)?.is_some();
        if duplicate {
            return Err(StoreError::Database(format!(
                "duplicate transaction id {}",
                entry.id
            )));
        }
        self.inserted.push(entry.clone());
        Ok(())
    }

    async fn finalize(
        &mut self,
        id: TransactionId,
        status: TransactionStatus,
        message: &str,
    ) -> Result<(), StoreError> {
        if let Some(entry) = self.inserted.iter_mut().find(|t| t.id == id) {
            if !entry.status.can_transition_to(status) {
                return Err(StoreError::InvalidStatusTransition {
                    id,
                    from: entry.status,
                    to: status,
                });
            }
            entry.status = status;
            entry.message = message.to_string();
            return Ok(());
        }

        let current = match self.finalized.get(&id) {
            Some((staged, _)) => *staged,
            None => self
                .committed_status(id)?
                .ok_or(StoreError::TransactionNotFound(id))?,
        };
        if !current.can_transition_to(status) {
            return Err(StoreError::InvalidStatusTransition {
                id,
                from: current,
                to: status,
            });
        }
        self.finalized.insert(id, (status, message.to_string()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        let mut ledger = this
            .ledger
            .write()
            .map_err(|_| StoreError::Database("ledger lock poisoned".to_string()))?;

        // Balances first: a reader that sees the new entry also sees its effect
        for locked in this.locked.values() {
            locked.row.balance.store(locked.working, Ordering::Release);
        }

        for (id, (status, message)) in this.finalized {
            if let Some(entry) = ledger.iter_mut().find(|t| t.id == id) {
                entry.status = status;
                entry.message = message;
            }
        }
        ledger.extend(this.inserted);

        // Row guards drop here, after both are published
        Ok(())
    }
}
