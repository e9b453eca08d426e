//! # pagebench
//!
//! Measures sequential throughput of hashing a file page by page and
//! persisting every page digest into an embedded key-value store:
//! - Fixed-size page reads through a reused buffer
//! - SHA-256 digest per page
//! - Durable put per page, keyed by the page index (8-byte little endian)
//! - Elapsed time and average byte rate for the whole run
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Throughput Pipeline                      │
//! └──────┬───────────────────────┬──────────────────────┬───────┘
//!        │ next page             │ hash                 │ put(index, digest)
//!        ▼                       ▼                      ▼
//!  ┌─────────────┐        ┌─────────────┐        ┌─────────────┐
//!  │ Page Reader │        │   Digest    │        │ Page Index  │
//!  └─────────────┘        └─────────────┘        └──────┬──────┘
//!                                                       │
//!                                    ┌──────────────────▼──────────────────┐
//!                                    │                Store                │
//!                                    │   WAL ──▶ MemTable ──▶ Tables       │
//!                                    └─────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod digest;
pub mod reader;
pub mod index;
pub mod pipeline;
pub mod human;

pub mod wal;
pub mod memtable;
pub mod storage;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PageBenchError, Result};
pub use config::{Config, StoreConfig};
pub use digest::{digest, PageDigest, DIGEST_SIZE};
pub use index::PageIndex;
pub use pipeline::{Pipeline, RunStats};
pub use reader::{Page, PageReader};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pagebench
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
