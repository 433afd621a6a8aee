//! Error types for PrismDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PrismError
pub type Result<T> = std::result::Result<T, PrismError>;

/// Unified error type for PrismDB operations
#[derive(Debug, Error)]
pub enum PrismError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("record not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("sort-key encoding failed: {0}")]
    Encoding(String),

    #[error("index fan-out limit exceeded: {0}")]
    FanoutExceeded(String),

    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("schema error: {0}")]
    Schema(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("store error: {0}")]
    Store(String),
}
