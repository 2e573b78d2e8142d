//! Fund Transfer Engine
//!
//! Moves funds between two wallets as one atomic unit of work and records
//! the attempt in the ledger.
//!
//! # State Machine
//!
//! ```text
//! PENDING ──(insufficient funds)──▶ FAILED
//!    └──────(debit + credit ok)───▶ COMPLETED
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Canonical lock order**: wallets are locked by ascending id, never by
//!    role, so opposite-direction transfers cannot deadlock
//! 2. **All-or-nothing**: balance deltas and the terminal ledger status commit
//!    together; any unexpected failure rolls back the PENDING row as well
//! 3. **Bounded wait**: every transfer runs under a deadline; expiry aborts the
//!    unit of work with no durable effect

pub mod engine;
pub mod error;
pub mod types;

mod integration_tests;

pub use engine::TransferEngine;
pub use error::TransferError;
pub use types::TransferRequest;
