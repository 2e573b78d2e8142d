//! Repository layer for wallet rows

use sqlx::{PgExecutor, Row};

use super::models::{Wallet, WalletId};
use crate::core_types::MinorUnits;

/// Wallet repository for `wallets` table queries
///
/// Locking queries take any executor so they can run on the transaction of
/// a unit of work; the plain reads run on the pool.
pub struct WalletRepository;

impl WalletRepository {
    /// Get wallet by ID (no lock)
    pub async fn get_by_id<'e, E>(executor: E, id: WalletId) -> Result<Option<Wallet>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query(r#"SELECT id, balance FROM wallets WHERE id = $1"#)
            .bind(id.inner())
            .fetch_optional(executor)
            .await?;

        Ok(row.map(|r| Wallet {
            id: WalletId::from_uuid(r.get("id")),
            balance: r.get("balance"),
        }))
    }

    /// Lock the wallet row (`FOR UPDATE`) and return its balance
    ///
    /// Blocks while another transaction holds the row.
    pub async fn lock_balance<'e, E>(
        executor: E,
        id: WalletId,
    ) -> Result<Option<MinorUnits>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(r#"SELECT balance FROM wallets WHERE id = $1 FOR UPDATE"#)
            .bind(id.inner())
            .fetch_optional(executor)
            .await
    }

    /// Apply a signed delta, returning the new balance
    ///
    /// `None` means no row matched. A negative result or BIGINT overflow is
    /// rejected by Postgres (check constraint / out of range).
    pub async fn apply_delta<'e, E>(
        executor: E,
        id: WalletId,
        delta: MinorUnits,
    ) -> Result<Option<MinorUnits>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            r#"UPDATE wallets SET balance = balance + $1 WHERE id = $2 RETURNING balance"#,
        )
        .bind(delta)
        .bind(id.inner())
        .fetch_optional(executor)
        .await
    }

    /// Insert a seed wallet, leaving an existing row untouched
    ///
    /// Returns true if the row was created.
    pub async fn insert_if_absent<'e, E>(executor: E, wallet: &Wallet) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"INSERT INTO wallets (id, balance) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING"#,
        )
        .bind(wallet.id.inner())
        .bind(wallet.balance)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
