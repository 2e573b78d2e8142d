//! Gateway types
//!
//! - [`ApiResponse<T>`]: unified response envelope
//! - [`ApiError`]: error half of every handler result
//! - [`error_codes`]: numeric codes carried in the envelope

pub mod error;
pub mod response;

pub use error::{ApiError, ApiResult, ok};
pub use response::{ApiResponse, HealthResponse, error_codes};
