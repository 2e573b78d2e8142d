//! Transfer Engine
//!
//! Runs one transfer as a single serializable unit of work:
//!
//! ```text
//! lock wallets (canonical order) → insert PENDING
//!     ├─ balance < amount ──────────────▶ FAILED    (commit, no balance change)
//!     └─ debit sender, credit recipient ▶ COMPLETED (commit)
//! ```
//!
//! Any store error along the way drops the unit of work, which rolls back
//! everything including the PENDING row. There are no compensation writes.
//!
//! A serialization conflict (Postgres `40001`/`40P01`) is retried on a fresh
//! unit of work with linear backoff, up to `max_attempts`. The deadline covers
//! all attempts.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::error::TransferError;
use super::types::TransferRequest;
use crate::config::TransferConfig;
use crate::core_types::MinorUnits;
use crate::ledger::{Transaction, TransactionStatus, messages};
use crate::store::{StoreError, TransferStore, UnitOfWork};

/// Transfer Engine - sole writer of wallet balances and ledger status
pub struct TransferEngine {
    store: Arc<dyn TransferStore>,
    deadline: Duration,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn TransferStore>, config: &TransferConfig) -> Self {
        Self::with_deadline(store, config.deadline())
            .with_retry(config.max_attempts, config.retry_backoff())
    }

    /// Engine with the given deadline and default conflict retry settings
    pub fn with_deadline(store: Arc<dyn TransferStore>, deadline: Duration) -> Self {
        let defaults = TransferConfig::default();
        Self {
            store,
            deadline,
            max_attempts: defaults.max_attempts,
            retry_backoff: defaults.retry_backoff(),
        }
    }

    /// Override conflict retry settings; at least one attempt is always made
    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = backoff;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Create and execute a transfer
    ///
    /// Returns the finalized ledger entry; a FAILED entry (insufficient
    /// balance) is a successful result. On expiry of the deadline the
    /// in-flight unit of work is dropped and nothing persists.
    pub async fn create_transfer(&self, req: TransferRequest) -> Result<Transaction, TransferError> {
        // Re-validate even though the gateway already did
        req.validate()?;

        match tokio::time::timeout(self.deadline, self.execute_with_retry(&req)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    from = %req.from,
                    to = %req.to,
                    amount = req.amount,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Transfer deadline exceeded, unit of work rolled back"
                );
                Err(TransferError::DeadlineExceeded(self.deadline))
            }
        }
    }

    /// Run `execute` until it succeeds, fails for a non-conflict reason, or
    /// the attempts run out
    async fn execute_with_retry(&self, req: &TransferRequest) -> Result<Transaction, TransferError> {
        let mut attempt = 1;
        loop {
            match self.execute(req).await {
                Err(TransferError::Conflict(reason)) if attempt < self.max_attempts => {
                    debug!(
                        from = %req.from,
                        to = %req.to,
                        attempt,
                        reason = %reason,
                        "Serialization conflict, retrying transfer"
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(TransferError::Conflict(reason)) => {
                    warn!(
                        from = %req.from,
                        to = %req.to,
                        attempts = attempt,
                        "Transfer conflict retries exhausted"
                    );
                    return Err(TransferError::Conflict(reason));
                }
                other => return other,
            }
        }
    }

    async fn execute(&self, req: &TransferRequest) -> Result<Transaction, TransferError> {
        let mut uow = self.store.begin().await?;

        let sender_balance = lock_wallets(uow.as_mut(), req).await?;

        let mut entry = Transaction::pending(req.from, req.to, req.amount);
        uow.insert_pending(&entry).await?;

        let (status, message) = if sender_balance < req.amount {
            debug!(
                transaction_id = %entry.id,
                sender_balance,
                amount = req.amount,
                "Insufficient balance"
            );
            (
                TransactionStatus::Failed,
                messages::SENDER_NOT_HAVE_ENOUGH_BALANCE,
            )
        } else {
            uow.adjust_balance(req.from, -req.amount).await?;
            uow.adjust_balance(req.to, req.amount).await?;
            (TransactionStatus::Completed, messages::TRANSACTION_COMPLETED)
        };

        uow.finalize(entry.id, status, message).await?;
        uow.commit().await?;

        entry.status = status;
        entry.message = message.to_string();

        info!(
            transaction_id = %entry.id,
            from = %entry.from,
            to = %entry.to,
            amount = entry.amount,
            status = %entry.status,
            "Transfer finalized"
        );
        Ok(entry)
    }
}

/// Lock both wallets in canonical order and return the sender's balance
///
/// A missing sender is reported in preference to a missing recipient.
async fn lock_wallets(
    uow: &mut dyn UnitOfWork,
    req: &TransferRequest,
) -> Result<MinorUnits, TransferError> {
    let mut sender_balance = None;
    let mut recipient_missing = false;

    for id in req.lock_order() {
        match uow.lock_wallet(id).await {
            Ok(balance) if id == req.from => sender_balance = Some(balance),
            Ok(_) => {}
            Err(StoreError::WalletNotFound(_)) if id == req.from => {
                return Err(TransferError::SenderWalletNotFound(req.from));
            }
            Err(StoreError::WalletNotFound(_)) => recipient_missing = true,
            Err(e) => return Err(e.into()),
        }
    }

    if recipient_missing {
        return Err(TransferError::RecipientWalletNotFound(req.to));
    }
    sender_balance.ok_or(TransferError::SenderWalletNotFound(req.from))
}
