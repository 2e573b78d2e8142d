//! Ledger Database Layer
//!
//! PostgreSQL persistence for ledger entries. Status updates are guarded by
//! `status = 'pending'` so a terminal row is never rewritten.

use sqlx::{PgExecutor, Row};

use super::models::{Transaction, TransactionId, TransactionStatus};
use crate::store::StoreError;
use crate::wallet::WalletId;

const SELECT_COLUMNS: &str =
    "SELECT id, from_address, to_address, amount, status, message, created_at FROM transactions";

/// Ledger repository for `transactions` table queries
pub struct LedgerRepository;

impl LedgerRepository {
    /// Insert a new entry; id, status and timestamp come from the caller
    pub async fn insert<'e, E>(executor: E, entry: &Transaction) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, from_address, to_address, amount, status, message, created_at)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id.inner())
        .bind(entry.from.inner())
        .bind(entry.to.inner())
        .bind(entry.amount)
        .bind(entry.status.as_str())
        .bind(&entry.message)
        .bind(entry.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// CAS update: set a terminal status only if the row is still PENDING
    ///
    /// Returns true if the row was updated.
    pub async fn finalize_if_pending<'e, E>(
        executor: E,
        id: TransactionId,
        status: TransactionStatus,
        message: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $1, message = $2
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(status.as_str())
        .bind(message)
        .bind(id.inner())
        .bind(TransactionStatus::Pending.as_str())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Current status of an entry, if it exists
    pub async fn get_status<'e, E>(
        executor: E,
        id: TransactionId,
    ) -> Result<Option<TransactionStatus>, StoreError>
    where
        E: PgExecutor<'e>,
    {
        let status: Option<String> =
            sqlx::query_scalar(r#"SELECT status FROM transactions WHERE id = $1"#)
                .bind(id.inner())
                .fetch_optional(executor)
                .await?;

        status
            .map(|s| s.parse().map_err(StoreError::CorruptRow))
            .transpose()
    }

    /// Most recent `limit` entries, newest first. `limit <= 0` yields nothing.
    pub async fn list_recent<'e, E>(executor: E, limit: i64) -> Result<Vec<Transaction>, StoreError>
    where
        E: PgExecutor<'e>,
    {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT $1");
        let rows = sqlx::query(&sql).bind(limit).fetch_all(executor).await?;

        rows.iter().map(row_to_transaction).collect()
    }

    /// All entries, newest first
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Transaction>, StoreError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query(&sql).fetch_all(executor).await?;

        rows.iter().map(row_to_transaction).collect()
    }
}

/// Convert database row to Transaction
fn row_to_transaction(row: &sqlx::postgres::PgRow) -> Result<Transaction, StoreError> {
    let status_str: String = row.try_get("status")?;
    let status = status_str.parse().map_err(StoreError::CorruptRow)?;

    let amount: i64 = row.try_get("amount")?;
    if amount <= 0 {
        tracing::warn!(amount, "Ledger row has non-positive amount");
    }

    Ok(Transaction {
        id: TransactionId::from_uuid(row.try_get("id")?),
        from: WalletId::from_uuid(row.try_get("from_address")?),
        to: WalletId::from_uuid(row.try_get("to_address")?),
        amount,
        status,
        message: row.try_get("message")?,
        created_at: row.try_get("created_at")?,
    })
}
