//! Error types for pagebench
//!
//! Provides a unified error type for all operations.
//!
//! ## Policy
//! Every error is fatal for a benchmark run. Components never retry, skip or
//! degrade; they return the error with `?` until it reaches the single
//! top-level handler in the binary, which reports it and exits non-zero.

use thiserror::Error;

/// Result type alias using PageBenchError
pub type Result<T> = std::result::Result<T, PageBenchError>;

/// Unified error type for pagebench operations
#[derive(Debug, Error)]
pub enum PageBenchError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Boundary Errors (raised by the index adapter)
    // -------------------------------------------------------------------------
    #[error("Store open failed: {0}")]
    StoreOpen(String),

    #[error("Store write failed: {0}")]
    StoreWrite(String),

    // -------------------------------------------------------------------------
    // Store Internals
    // -------------------------------------------------------------------------
    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PageBenchError {
    /// The underlying I/O error kind, if this is an I/O failure
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            PageBenchError::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}
