//! Error types for the product API
//!
//! Provides unified error handling using thiserror. Only `ServiceError`
//! reaches the HTTP boundary; `BackendError` never leaves the cache layer.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == Backend Error Enum ==
/// Failure talking to a cache store. Swallowed by `ProductCache`.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Redis connection, protocol or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The operation did not finish within the configured bound
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store refused the write (oversized key or value)
    #[error("Cache write rejected: {0}")]
    Rejected(String),

    /// Backend cannot serve requests
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

// == Store Error Enum ==
/// Failure of the durable record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database driver or connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store could not be reached or initialised
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Service Error Enum ==
/// Caller-visible outcome of a failed product operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No product with this id
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body exceeds the accepted size
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The record store failed; there is no fallback below it
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Product not found".to_string()),
            ServiceError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            ServiceError::Store(err) => {
                error!(error = %err, "Record store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for product operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
