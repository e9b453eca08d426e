//! Table Manager
//!
//! Manages the set of table files and coordinates reads/writes.
//!
//! ## Responsibilities
//! - Discover existing tables on startup
//! - Search tables newest → oldest for reads
//! - Create new tables from MemTable flushes
//! - Compact all tables into one when too many pile up
//! - Remove tables left unfinished by an interrupted flush

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::DEFAULT_MAX_TABLES;
use crate::error::{PageBenchError, Result};
use crate::memtable::MemTable;

use super::table::{sync_dir, TMP_EXTENSION};
use super::{TableBuilder, TableInfo, TableReader};

/// Manages the on-disk tables
pub struct TableManager {
    /// Directory where tables are stored
    data_dir: PathBuf,

    /// Open table readers, ordered newest → oldest
    tables: RwLock<Vec<TableReader>>,

    /// Next ID for creating new tables
    next_table_id: AtomicU64,

    /// Table count above which a flush triggers compaction
    max_tables: usize,
}

impl TableManager {
    /// Open or create table storage in the given directory
    ///
    /// On startup:
    /// 1. Create directory if it doesn't exist
    /// 2. Delete unfinished `*.tmp` tables, discover finished ones
    /// 3. Open readers for each (loads indexes into RAM)
    /// 4. Order by ID descending (newest first)
    pub fn open(path: &Path) -> Result<Self> {
        fs::create_dir_all(path)?;

        let mut table_ids: Vec<u64> = Vec::new();
        let mut removed_tmp = false;
        for entry in fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            if file_path.extension().is_some_and(|ext| ext == TMP_EXTENSION) {
                tracing::warn!(path = %file_path.display(), "Removing unfinished table");
                fs::remove_file(&file_path)?;
                removed_tmp = true;
                continue;
            }
            if let Some(id) = Self::parse_table_id(&file_path) {
                table_ids.push(id);
            }
        }
        if removed_tmp {
            sync_dir(path)?;
        }

        table_ids.sort_unstable_by(|a, b| b.cmp(a));

        let mut tables = Vec::with_capacity(table_ids.len());
        for id in &table_ids {
            tables.push(TableReader::open(&Self::table_path_with_dir(path, *id))?);
        }

        let next_id = table_ids.first().map(|&id| id + 1).unwrap_or(1);

        tracing::debug!(dir = %path.display(), tables = tables.len(), "Opened table storage");

        Ok(Self {
            data_dir: path.to_path_buf(),
            tables: RwLock::new(tables),
            next_table_id: AtomicU64::new(next_id),
            max_tables: DEFAULT_MAX_TABLES,
        })
    }

    /// Set the table count above which flushes compact (minimum 1)
    pub fn with_max_tables(mut self, max_tables: usize) -> Self {
        self.max_tables = max_tables.max(1);
        self
    }

    /// Get a value by key (searches all tables newest → oldest)
    ///
    /// Write lock: TableReader::get() moves the file cursor.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut tables = self.tables.write();

        for reader in tables.iter_mut() {
            if !reader.might_contain(key) {
                continue;
            }
            if let Some(value) = reader.get(key)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }

    /// Flush a MemTable to a new table
    ///
    /// Creates a new table file from the MemTable's sorted entries,
    /// opens a reader for it, and adds it to the front of the list.
    /// Compacts afterwards if that leaves more than `max_tables` tables.
    pub fn flush(&self, memtable: &MemTable) -> Result<TableInfo> {
        if memtable.is_empty() {
            return Err(PageBenchError::Storage(
                "Cannot flush empty MemTable".to_string(),
            ));
        }

        let (info, reader) = self.build_table(memtable.snapshot())?;
        let table_count = {
            let mut tables = self.tables.write();
            tables.insert(0, reader);
            tables.len()
        };

        tracing::debug!(
            path = %info.path.display(),
            entries = info.entry_count,
            bytes = info.file_size,
            "Flushed memtable"
        );

        if table_count > self.max_tables {
            self.compact()?;
        }

        Ok(info)
    }

    /// Merge every table into a single new one
    ///
    /// The merged table gets the highest ID before the old files are
    /// removed, so a crash in between leaves duplicates that newest-first
    /// lookups resolve correctly. Returns `None` with fewer than two tables.
    pub fn compact(&self) -> Result<Option<TableInfo>> {
        let mut tables = self.tables.write();
        if tables.len() < 2 {
            return Ok(None);
        }

        let mut merged = BTreeMap::new();
        Self::merge_into(&mut tables, &mut merged)?;

        let (info, reader) = self.build_table(merged)?;
        let old = std::mem::replace(&mut *tables, vec![reader]);
        drop(tables);

        let old_paths: Vec<PathBuf> = old.iter().map(|r| r.path().to_path_buf()).collect();
        drop(old);
        for path in &old_paths {
            fs::remove_file(path)?;
        }
        sync_dir(&self.data_dir)?;

        tracing::debug!(
            path = %info.path.display(),
            merged_tables = old_paths.len(),
            entries = info.entry_count,
            "Compacted tables"
        );

        Ok(Some(info))
    }

    /// All live key-value pairs across tables; newer tables win
    pub fn collect_into(&self, out: &mut BTreeMap<Vec<u8>, Vec<u8>>) -> Result<()> {
        let mut tables = self.tables.write();
        Self::merge_into(&mut tables, out)
    }

    /// Get the number of tables
    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Write sorted entries to a fresh table and open it
    fn build_table(
        &self,
        entries: impl IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    ) -> Result<(TableInfo, TableReader)> {
        let id = self.next_table_id.fetch_add(1, Ordering::SeqCst);
        let path = self.table_path(id);

        let mut builder = TableBuilder::new(&path)?;
        for (key, value) in entries {
            builder.add(&key, &value)?;
        }
        let info = builder.finish()?;

        let reader = TableReader::open(&path)?;
        Ok((info, reader))
    }

    /// Oldest → newest, so later inserts overwrite stale values
    fn merge_into(
        tables: &mut [TableReader],
        out: &mut BTreeMap<Vec<u8>, Vec<u8>>,
    ) -> Result<()> {
        for reader in tables.iter_mut().rev() {
            for item in reader.iter()? {
                let (key, value) = item?;
                out.insert(key, value);
            }
        }
        Ok(())
    }

    fn table_path(&self, id: u64) -> PathBuf {
        Self::table_path_with_dir(&self.data_dir, id)
    }

    fn table_path_with_dir(dir: &Path, id: u64) -> PathBuf {
        dir.join(format!("table_{:06}.tbl", id))
    }

    /// "table_000042.tbl" → Some(42)
    fn parse_table_id(path: &Path) -> Option<u64> {
        if path.extension()? != "tbl" {
            return None;
        }
        let name = path.file_stem()?.to_string_lossy();
        name.strip_prefix("table_")?.parse().ok()
    }
}
