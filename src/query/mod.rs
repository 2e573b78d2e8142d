//! Query Service
//!
//! Stateless read path over the ledger and wallet store. Reads are unlocked
//! and only ever observe committed state.

pub mod error;
pub mod service;
pub mod types;

pub use error::QueryError;
pub use service::QueryService;
pub use types::{TransactionResponse, WalletResponse};
