//! Storage Module
//!
//! Persistent storage layer: immutable sorted table files produced by
//! memtable flushes.
//!
//! ## Responsibilities
//! - Persist flushed memtables to disk in sorted order
//! - Point lookups via an in-memory index per table
//! - Full scans for snapshots
//! - Compaction of many tables into one
//!
//! ## File Format
//! See [`table`] for the on-disk layout.

pub mod table;
mod manager;

pub use table::{TableBuilder, TableInfo, TableIterator, TableReader};
pub use manager::TableManager;
