//! Response DTOs for the product API
//!
//! Product bodies are serialized straight from `Product`; this module holds
//! the remaining response shapes.

use serde::Serialize;

/// Response body for the health endpoint (GET /health)
///
/// Liveness only: neither the cache nor the store is probed.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status, always "ok"
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
