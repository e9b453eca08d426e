//! Table Module
//!
//! Immutable on-disk sorted key-value storage.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "PGBT" (4) | Version: u16 (2) | Count: u64 (8) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Data Block (variable)                                   │
//! │   [KeyLen: u32][ValLen: u32][Key][Value]                │
//! │   ... repeated for each entry ...                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Index Block (variable)                                  │
//! │   [KeyLen: u32][Offset: u64][Key]                       │
//! │   ... repeated for each entry ...                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (16 bytes)                                       │
//! │   IndexOffset: u64 (8) | DataCRC: u32 (4) | Padding (4) │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! A table is written under `<name>.tmp` and renamed into place once it is
//! synced, so a table file under its final name is always complete.

mod builder;
mod iterator;
mod reader;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use builder::TableBuilder;
pub use iterator::TableIterator;
pub use reader::TableReader;

/// Magic bytes identifying a pagebench table file
pub(crate) const MAGIC: &[u8; 4] = b"PGBT";

/// Current table format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + EntryCount (8) = 14 bytes
pub(crate) const HEADER_SIZE: u64 = 14;

/// Footer size: IndexOffset (8) + DataCRC (4) + Padding (4) = 16 bytes
pub(crate) const FOOTER_SIZE: u64 = 16;

/// Suffix of tables still being written
pub(crate) const TMP_EXTENSION: &str = "tmp";

/// "table_000001.tbl" → "table_000001.tbl.tmp"
pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(TMP_EXTENSION);
    PathBuf::from(name)
}

/// fsync a directory so renames and removals in it are durable
pub(crate) fn sync_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    std::fs::File::open(dir)?.sync_all()?;
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

/// What a finished build produced
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub path: PathBuf,
    pub entry_count: u64,
    pub file_size: u64,
}
