//! MemTable Module
//!
//! In-memory data structure for recent writes.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Track size for flush triggers
//! - Ordered iteration for table creation
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in RwLock: keys come out sorted, which is what a table
//! flush needs. Page keys are little-endian, so byte order is not page order;
//! nothing here depends on page order.

mod table;

pub use table::MemTable;
