//! Integration Tests for the Transfer Engine
//!
//! These tests run the complete protocol against the in-memory store. It
//! shares the row-locking and rollback behaviour of Postgres but never raises
//! serialization conflicts; `ConflictingStore` injects those on commit so the
//! retry path is covered too. Postgres concurrency runs in `store::postgres`.

#[cfg(test)]
mod integration_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::core_types::MinorUnits;
    use crate::ledger::{Transaction, TransactionStatus, messages};
    use crate::store::{MemoryStore, StoreError, TransferStore, UnitOfWork};
    use crate::transfer::{TransferEngine, TransferError, TransferRequest};
    use crate::wallet::{Wallet, WalletId};

    /// Engine over a shared in-memory store
    struct TestHarness {
        store: Arc<MemoryStore>,
        engine: Arc<TransferEngine>,
    }

    impl TestHarness {
        fn new() -> Self {
            Self::with_deadline(Duration::from_secs(5))
        }

        fn with_deadline(deadline: Duration) -> Self {
            let store = Arc::new(MemoryStore::new());
            let engine = Arc::new(TransferEngine::with_deadline(
                store.clone() as Arc<dyn TransferStore>,
                deadline,
            ));
            Self { store, engine }
        }

        fn wallet(&self, balance: MinorUnits) -> WalletId {
            let id = WalletId::new();
            self.store.insert_wallet(Wallet::new(id, balance));
            id
        }

        async fn balance(&self, id: WalletId) -> MinorUnits {
            self.store.get_wallet(id).await.unwrap().balance
        }

        async fn ledger(&self) -> Vec<Transaction> {
            self.store.list_all().await.unwrap()
        }

        async fn transfer(
            &self,
            from: WalletId,
            to: WalletId,
            amount: MinorUnits,
        ) -> Result<Transaction, TransferError> {
            self.engine
                .create_transfer(TransferRequest::new(from, to, amount))
                .await
        }
    }

    // ========================================================================
    // Happy Path Tests
    // ========================================================================

    /// A=10000, B=5000, A→B 3000 ⇒ A=7000, B=8000, COMPLETED
    #[tokio::test]
    async fn test_transfer_completes() {
        let h = TestHarness::new();
        let a = h.wallet(10_000);
        let b = h.wallet(5_000);

        let tx = h.transfer(a, b, 3_000).await.unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.message, messages::TRANSACTION_COMPLETED);
        assert_eq!((tx.from, tx.to, tx.amount), (a, b, 3_000));
        assert_eq!(h.balance(a).await, 7_000);
        assert_eq!(h.balance(b).await, 8_000);

        let ledger = h.ledger().await;
        assert_eq!(ledger, vec![tx]);
    }

    #[tokio::test]
    async fn test_transfer_of_entire_balance() {
        let h = TestHarness::new();
        let a = h.wallet(2_500);
        let b = h.wallet(0);

        let tx = h.transfer(a, b, 2_500).await.unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(h.balance(a).await, 0);
        assert_eq!(h.balance(b).await, 2_500);
    }

    // ========================================================================
    // Business Failure Tests
    // ========================================================================

    /// A=100, A→B 5000 ⇒ balances unchanged, FAILED with insufficient-balance message
    #[tokio::test]
    async fn test_insufficient_balance_records_failed_entry() {
        let h = TestHarness::new();
        let a = h.wallet(100);
        let b = h.wallet(5_000);

        let tx = h.transfer(a, b, 5_000).await.unwrap();

        assert_eq!(tx.status, TransactionStatus::Failed);
        assert_eq!(tx.message, messages::SENDER_NOT_HAVE_ENOUGH_BALANCE);
        assert_eq!(h.balance(a).await, 100);
        assert_eq!(h.balance(b).await, 5_000);

        let ledger = h.ledger().await;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].status, TransactionStatus::Failed);
        assert_eq!(ledger[0].message, messages::SENDER_NOT_HAVE_ENOUGH_BALANCE);
    }

    // ========================================================================
    // Not-Found & Precondition Tests (no ledger row)
    // ========================================================================

    #[tokio::test]
    async fn test_missing_sender_writes_nothing() {
        let h = TestHarness::new();
        let b = h.wallet(5_000);
        let c = WalletId::new();

        let result = h.transfer(c, b, 10).await;

        assert!(matches!(result, Err(TransferError::SenderWalletNotFound(id)) if id == c));
        assert!(h.ledger().await.is_empty());
        assert_eq!(h.balance(b).await, 5_000);
    }

    #[tokio::test]
    async fn test_missing_recipient_writes_nothing() {
        let h = TestHarness::new();
        let a = h.wallet(5_000);
        let c = WalletId::new();

        let result = h.transfer(a, c, 10).await;

        assert!(matches!(result, Err(TransferError::RecipientWalletNotFound(id)) if id == c));
        assert!(h.ledger().await.is_empty());
        assert_eq!(h.balance(a).await, 5_000);
    }

    #[tokio::test]
    async fn test_both_missing_reports_sender() {
        let h = TestHarness::new();
        let from = WalletId::new();
        let to = WalletId::new();

        let result = h.transfer(from, to, 10).await;

        assert!(matches!(result, Err(TransferError::SenderWalletNotFound(id)) if id == from));
        assert!(h.ledger().await.is_empty());
    }

    #[tokio::test]
    async fn test_preconditions_rejected_before_locking() {
        let h = TestHarness::new();
        let a = h.wallet(1_000);
        let b = h.wallet(1_000);

        assert!(matches!(
            h.transfer(a, a, 10).await,
            Err(TransferError::SameWallet)
        ));
        assert!(matches!(
            h.transfer(a, b, 0).await,
            Err(TransferError::InvalidAmount(0))
        ));
        assert!(matches!(
            h.transfer(a, b, -10).await,
            Err(TransferError::InvalidAmount(-10))
        ));
        assert!(h.ledger().await.is_empty());
        assert_eq!(h.balance(a).await, 1_000);
    }

    // ========================================================================
    // Rollback Tests
    // ========================================================================

    /// Credit overflow aborts the whole unit of work, PENDING row included
    #[tokio::test]
    async fn test_credit_failure_rolls_back_everything() {
        let h = TestHarness::new();
        let a = h.wallet(1_000);
        let b = h.wallet(i64::MAX);

        let result = h.transfer(a, b, 1).await;

        assert!(matches!(
            result,
            Err(TransferError::Store(StoreError::BalanceConstraint(id))) if id == b
        ));
        assert_eq!(h.balance(a).await, 1_000, "debit must be rolled back");
        assert_eq!(h.balance(b).await, i64::MAX);
        assert!(h.ledger().await.is_empty(), "no PENDING row may survive");

        // Locks were released by the rollback
        let c = h.wallet(0);
        let tx = h.transfer(a, c, 1).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn test_deadline_exceeded_while_wallet_locked() {
        let h = TestHarness::with_deadline(Duration::from_millis(50));
        let a = h.wallet(1_000);
        let b = h.wallet(1_000);

        let mut holder = h.store.begin().await.unwrap();
        holder.lock_wallet(a).await.unwrap();

        let result = h.transfer(a, b, 10).await;
        assert!(matches!(result, Err(TransferError::DeadlineExceeded(_))));
        assert!(result.unwrap_err().is_retryable());

        drop(holder);

        assert!(h.ledger().await.is_empty());
        assert_eq!(h.balance(a).await, 1_000);
        assert_eq!(h.balance(b).await, 1_000);

        // Retrying after the lock is released succeeds
        let tx = h.transfer(a, b, 10).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    // ========================================================================
    // Concurrency Tests
    // ========================================================================

    /// N concurrent transfers X→Y of `a` move exactly N*a
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_direction() {
        const N: i64 = 64;
        const AMOUNT: i64 = 25;

        let h = TestHarness::new();
        let x = h.wallet(10_000);
        let y = h.wallet(500);

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let engine = h.engine.clone();
                tokio::spawn(async move {
                    engine
                        .create_transfer(TransferRequest::new(x, y, AMOUNT))
                        .await
                })
            })
            .collect();

        for handle in handles {
            let tx = handle.await.unwrap().unwrap();
            assert_eq!(tx.status, TransactionStatus::Completed);
        }

        assert_eq!(h.balance(x).await, 10_000 - N * AMOUNT);
        assert_eq!(h.balance(y).await, 500 + N * AMOUNT);

        let ledger = h.ledger().await;
        assert_eq!(ledger.len() as i64, N);
        assert!(ledger.iter().all(|t| t.status == TransactionStatus::Completed));
    }

    /// Opposite-direction transfers between one pair must not deadlock
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_opposite_directions_do_not_deadlock() {
        const PER_DIRECTION: usize = 50;

        let h = TestHarness::with_deadline(Duration::from_secs(10));
        let a = h.wallet(1_000);
        let b = h.wallet(1_000);

        let mut handles = Vec::new();
        for i in 0..PER_DIRECTION * 2 {
            let engine = h.engine.clone();
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            handles.push(tokio::spawn(async move {
                engine
                    .create_transfer(TransferRequest::new(from, to, 7))
                    .await
            }));
        }

        for handle in handles {
            let tx = handle.await.unwrap().expect("no transfer may time out");
            assert_eq!(tx.status, TransactionStatus::Completed);
        }

        // Equal volume both ways
        assert_eq!(h.balance(a).await, 1_000);
        assert_eq!(h.balance(b).await, 1_000);
        assert_eq!(h.ledger().await.len(), PER_DIRECTION * 2);
    }

    /// Concurrent overdraw attempts never drive a balance negative
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_overdraw_is_serialized() {
        let h = TestHarness::new();
        let x = h.wallet(100);
        let y = h.wallet(0);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let engine = h.engine.clone();
                tokio::spawn(async move {
                    engine.create_transfer(TransferRequest::new(x, y, 10)).await
                })
            })
            .collect();

        let mut completed = 0;
        let mut failed = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap().status {
                TransactionStatus::Completed => completed += 1,
                TransactionStatus::Failed => failed += 1,
                TransactionStatus::Pending => panic!("PENDING returned to caller"),
            }
        }

        assert_eq!(completed, 10);
        assert_eq!(failed, 10);
        assert_eq!(h.balance(x).await, 0);
        assert_eq!(h.balance(y).await, 100);
    }

    // ========================================================================
    // Read Path
    // ========================================================================

    #[tokio::test]
    async fn test_list_all_is_stable_without_writes() {
        let h = TestHarness::new();
        let a = h.wallet(1_000);
        let b = h.wallet(1_000);
        for amount in [10, 2_000, 30] {
            h.transfer(a, b, amount).await.unwrap();
        }

        let first = h.ledger().await;
        let second = h.ledger().await;
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert!(first.iter().all(|t| t.status.is_terminal()));
    }

    // ========================================================================
    // Serialization Conflict Retry
    // ========================================================================

    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use crate::ledger::TransactionId;

    /// Memory store whose next `conflicts` commits fail like Postgres `40001`
    struct ConflictingStore {
        inner: MemoryStore,
        remaining: Arc<AtomicU32>,
    }

    struct ConflictingUnitOfWork {
        inner: Box<dyn UnitOfWork>,
        remaining: Arc<AtomicU32>,
    }

    #[async_trait]
    impl TransferStore for ConflictingStore {
        fn name(&self) -> &'static str {
            "conflicting"
        }

        async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
            Ok(Box::new(ConflictingUnitOfWork {
                inner: self.inner.begin().await?,
                remaining: self.remaining.clone(),
            }))
        }

        async fn get_wallet(&self, id: WalletId) -> Result<Wallet, StoreError> {
            self.inner.get_wallet(id).await
        }

        async fn list_recent(&self, n: i64) -> Result<Vec<Transaction>, StoreError> {
            self.inner.list_recent(n).await
        }

        async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
            self.inner.list_all().await
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[async_trait]
    impl UnitOfWork for ConflictingUnitOfWork {
        async fn lock_wallet(&mut self, id: WalletId) -> Result<MinorUnits, StoreError> {
            self.inner.lock_wallet(id).await
        }

        async fn adjust_balance(&mut self, id: WalletId, delta: MinorUnits) -> Result<(), StoreError> {
            self.inner.adjust_balance(id, delta).await
        }

        async fn insert_pending(&mut self, entry: &Transaction) -> Result<(), StoreError> {
            self.inner.insert_pending(entry).await
        }

        async fn finalize(
            &mut self,
            id: TransactionId,
            status: TransactionStatus,
            message: &str,
        ) -> Result<(), StoreError> {
            self.inner.finalize(id, status, message).await
        }

        async fn commit(self: Box<Self>) -> Result<(), StoreError> {
            let conflict = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if conflict {
                // Dropping `inner` rolls the attempt back
                return Err(StoreError::Conflict(
                    "could not serialize access due to concurrent update".to_string(),
                ));
            }
            self.inner.commit().await
        }
    }

    fn conflicting(conflicts: u32, a: MinorUnits, b: MinorUnits) -> (Arc<ConflictingStore>, WalletId, WalletId) {
        let (wa, wb) = (WalletId::new(), WalletId::new());
        let store = Arc::new(ConflictingStore {
            inner: MemoryStore::with_wallets([Wallet::new(wa, a), Wallet::new(wb, b)]),
            remaining: Arc::new(AtomicU32::new(conflicts)),
        });
        (store, wa, wb)
    }

    #[tokio::test]
    async fn test_conflict_is_retried_until_commit_succeeds() {
        let (store, a, b) = conflicting(3, 10_000, 0);
        let engine = TransferEngine::with_deadline(store.clone(), Duration::from_secs(5))
            .with_retry(10, Duration::from_millis(1));

        let tx = engine
            .create_transfer(TransferRequest::new(a, b, 25))
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(store.remaining.load(Ordering::SeqCst), 0);
        assert_eq!(store.get_wallet(a).await.unwrap().balance, 9_975);
        assert_eq!(store.get_wallet(b).await.unwrap().balance, 25);

        // Rolled-back attempts leave no rows behind
        assert_eq!(store.list_all().await.unwrap(), vec![tx]);
    }

    #[tokio::test]
    async fn test_conflict_returned_when_attempts_exhausted() {
        let (store, a, b) = conflicting(5, 10_000, 0);
        let engine = TransferEngine::with_deadline(store.clone(), Duration::from_secs(5))
            .with_retry(2, Duration::from_millis(1));

        let result = engine.create_transfer(TransferRequest::new(a, b, 25)).await;

        assert!(matches!(result, Err(TransferError::Conflict(_))));
        assert_eq!(store.remaining.load(Ordering::SeqCst), 3);
        assert_eq!(store.get_wallet(a).await.unwrap().balance, 10_000);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_bounds_retries() {
        let (store, a, b) = conflicting(u32::MAX, 10_000, 0);
        let engine = TransferEngine::with_deadline(store.clone(), Duration::from_millis(100))
            .with_retry(1_000, Duration::from_millis(20));

        let result = engine.create_transfer(TransferRequest::new(a, b, 25)).await;

        assert!(matches!(result, Err(TransferError::DeadlineExceeded(_))));
        assert_eq!(store.get_wallet(a).await.unwrap().balance, 10_000);
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
