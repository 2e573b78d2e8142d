//! Wallet store
//!
//! Wallet rows (`wallets` table): point reads for the query path, and the
//! locked read / balance update pair used inside a transfer's unit of work.

pub mod models;
pub mod repository;

pub use models::{Wallet, WalletId};
pub use repository::WalletRepository;
