//! API Response types and error codes

use serde::{Deserialize, Serialize};

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Health check response data
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Store backend name
    pub store: String,
    /// Build revision baked in at compile time
    pub revision: String,
    /// Server timestamp in milliseconds
    pub timestamp_ms: i64,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const SAME_WALLET: i32 = 1002;
    pub const INVALID_AMOUNT: i32 = 1003;
    pub const INVALID_COUNT: i32 = 1004;
    pub const UNSUPPORTED_MEDIA_TYPE: i32 = 1005;

    // Resource errors (4xxx)
    pub const SENDER_WALLET_NOT_FOUND: i32 = 4001;
    pub const RECIPIENT_WALLET_NOT_FOUND: i32 = 4002;
    pub const WALLET_NOT_FOUND: i32 = 4004;
    pub const CONFLICT: i32 = 4090;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const DEADLINE_EXCEEDED: i32 = 5002;
}
