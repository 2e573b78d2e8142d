//! Database connection management
//!
//! The pool is an explicitly owned handle: created at startup, passed into
//! the store, closed on shutdown.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::PostgresConfig;
use crate::wallet::{Wallet, WalletRepository};

const CREATE_WALLETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallets (
    id      UUID PRIMARY KEY,
    balance BIGINT NOT NULL CHECK (balance >= 0)
)
"#;

// from_address/to_address reference wallets.id without a foreign key
const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id           UUID PRIMARY KEY,
    from_address UUID NOT NULL,
    to_address   UUID NOT NULL,
    amount       BIGINT NOT NULL CHECK (amount > 0),
    status       TEXT NOT NULL CHECK (status IN ('pending', 'completed', 'failed')),
    message      TEXT NOT NULL DEFAULT '',
    created_at   TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_TRANSACTIONS_CREATED_AT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS transactions_created_at_idx
    ON transactions (created_at DESC, id DESC)
"#;

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(config: &PostgresConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "PostgreSQL connection pool established"
        );
        Ok(Self { pool })
    }

    /// Connect with default pool settings
    pub async fn connect_url(database_url: &str) -> Result<Self, sqlx::Error> {
        let config = PostgresConfig {
            url: database_url.to_string(),
            ..PostgresConfig::default()
        };
        Self::connect(&config).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create tables and indexes if missing
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        tracing::info!("Initializing wallet/ledger schema...");

        for statement in [
            CREATE_WALLETS_TABLE,
            CREATE_TRANSACTIONS_TABLE,
            CREATE_TRANSACTIONS_CREATED_AT_INDEX,
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }

    /// Insert seed wallets that do not exist yet
    ///
    /// Returns the number of wallets created.
    pub async fn seed_wallets(&self, wallets: &[Wallet]) -> Result<usize, sqlx::Error> {
        let mut created = 0;
        for wallet in wallets {
            if WalletRepository::insert_if_absent(&self.pool, wallet).await? {
                created += 1;
            }
        }

        tracing::info!(created, total = wallets.len(), "Seed wallets applied");
        Ok(created)
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL connection pool closed");
    }
}
