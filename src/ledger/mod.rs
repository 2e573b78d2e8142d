//! Transaction ledger
//!
//! Append/update-only log of transfer attempts (`transactions` table), one row
//! per transfer with a monotonic `pending -> completed | failed` status.

pub mod models;
pub mod repository;

pub use models::{Transaction, TransactionId, TransactionStatus, messages, sort_newest_first};
pub use repository::LedgerRepository;
