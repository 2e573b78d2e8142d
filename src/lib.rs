//! Wallet Ledger - wallet-to-wallet fund transfers
//!
//! Moves integer amounts between wallets with an auditable ledger entry per
//! attempt, under concurrent access from many callers.
//!
//! # Modules
//!
//! - [`core_types`] - Shared scalar types (MinorUnits)
//! - [`wallet`] - Wallet rows and their repository
//! - [`ledger`] - Transaction entries, statuses and outcome messages
//! - [`store`] - Unit-of-work abstraction with Postgres and in-memory backends
//! - [`transfer`] - Transfer engine (lock ordering, deadline, state machine)
//! - [`query`] - Read path over ledger and balances
//! - [`gateway`] - axum HTTP layer
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`config`] / [`logging`] - Ambient configuration and tracing setup

// Core types - must be first!
pub mod core_types;

pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod query;
pub mod store;
pub mod transfer;
pub mod wallet;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use core_types::MinorUnits;
pub use db::Database;
pub use ledger::{Transaction, TransactionId, TransactionStatus};
pub use query::{QueryError, QueryService};
pub use store::{MemoryStore, PgStore, StoreError, TransferStore, UnitOfWork};
pub use transfer::{TransferEngine, TransferError, TransferRequest};
pub use wallet::{Wallet, WalletId};
