//! Store Module
//!
//! The embedded key-value store that page digests are persisted into.
//!
//! ## Responsibilities
//! - Coordinate WAL, MemTable, and table storage
//! - Make every `put` durable through the WAL before acknowledging it
//! - Trigger flushes when the MemTable is full
//! - Recover unflushed writes from the WAL on startup
//! - Hold the directory lock for as long as the handle lives

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs4::fs_std::FileExt;
use parking_lot::Mutex;

use crate::config::StoreConfig;
use crate::error::{PageBenchError, Result};
use crate::memtable::MemTable;
use crate::storage::TableManager;
use crate::wal::{WalRecovery, WalWriter};

/// An embedded, durable key-value store
///
/// Writes go WAL → MemTable; a full MemTable is flushed into an immutable
/// table file and the WAL is truncated. Once more than `max_tables` tables
/// exist they are merged into one. Reads check the MemTable, then
/// tables newest → oldest. Overwrites are allowed; the newest value wins.
pub struct Store {
    config: StoreConfig,

    /// Write-ahead log; its mutex also serializes writers
    wal: Mutex<WalWriter>,

    memtable: MemTable,

    tables: TableManager,

    /// Released on drop, on error paths, and by the OS if the process dies
    _lock: DirLock,
}

impl Store {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const WAL_FILENAME: &'static str = "wal.log";
    const TABLE_DIR: &'static str = "tables";
    const LOCK_FILENAME: &'static str = "LOCK";

    /// Open or create a store
    ///
    /// On startup:
    /// 1. Create the data directory and take its lock
    /// 2. Load existing tables
    /// 3. Replay the WAL and flush what it held into a table
    /// 4. Open the WAL for appends
    pub fn open(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let lock = DirLock::acquire(&config.data_dir.join(Self::LOCK_FILENAME))?;

        let tables = TableManager::open(&config.data_dir.join(Self::TABLE_DIR))?
            .with_max_tables(config.max_tables);
        let memtable = MemTable::new();
        let wal_path = config.data_dir.join(Self::WAL_FILENAME);

        let mut replayed = false;
        if wal_path.exists() {
            let (entries, result) = WalRecovery::recover(&wal_path)?;

            if result.entries_recovered > 0 || result.entries_corrupted > 0 {
                tracing::info!(
                    recovered = result.entries_recovered,
                    corrupted = result.entries_corrupted,
                    last_lsn = result.last_lsn,
                    "WAL recovery"
                );
            }

            for entry in entries {
                memtable.put(entry.key, entry.value);
            }

            // Recovered data goes to a table before the WAL is cleared
            if !memtable.is_empty() {
                tables.flush(&memtable)?;
                memtable.clear();
                replayed = true;
            }
        }

        let mut wal = WalWriter::open(&wal_path, config.wal_sync_strategy)?;
        if replayed {
            wal.truncate()?;
        }

        tracing::debug!(dir = %config.data_dir.display(), "Store opened");

        Ok(Self {
            config,
            wal: Mutex::new(wal),
            memtable,
            tables,
            _lock: lock,
        })
    }

    /// Open with a path, default settings otherwise
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(StoreConfig::with_dir(path))
    }

    /// Put a key-value pair
    ///
    /// Returns once the WAL record is written (and synced, per the sync
    /// strategy). Overwrites any earlier value for the key.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut wal = self.wal.lock();

        wal.append(key, value)?;

        let new_size = self.memtable.put(key.to_vec(), value.to_vec());
        if new_size >= self.config.memtable_size_limit {
            self.flush_locked(&mut wal)?;
        }

        Ok(())
    }

    /// Get a value by key
    ///
    /// Search order:
    /// 1. MemTable (most recent writes)
    /// 2. Tables (newest to oldest)
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(value) = self.memtable.get(key) {
            return Ok(Some(value));
        }
        self.tables.get(key)
    }

    /// Every live key-value pair, newest value per key
    pub fn entries(&self) -> Result<BTreeMap<Vec<u8>, Vec<u8>>> {
        let mut out = BTreeMap::new();
        self.tables.collect_into(&mut out)?;
        for (key, value) in self.memtable.snapshot() {
            out.insert(key, value);
        }
        Ok(out)
    }

    /// Flush memtable to disk regardless of its size
    pub fn flush(&self) -> Result<()> {
        let mut wal = self.wal.lock();
        self.flush_locked(&mut wal)
    }

    /// Flush with the WAL lock already held
    fn flush_locked(&self, wal: &mut WalWriter) -> Result<()> {
        if self.memtable.is_empty() {
            return Ok(());
        }

        // Buffered WAL records must be on disk before the table supersedes them
        wal.sync()?;
        self.tables.flush(&self.memtable)?;
        self.memtable.clear();
        wal.truncate()?;

        Ok(())
    }

    /// Close the store gracefully
    ///
    /// Flushes pending data, syncs the WAL and releases the directory lock.
    pub fn close(self) -> Result<()> {
        {
            let mut wal = self.wal.lock();
            self.flush_locked(&mut wal)?;
            wal.sync()?;
        }

        tracing::debug!(dir = %self.config.data_dir.display(), "Store closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the memtable entry count
    pub fn memtable_entry_count(&self) -> usize {
        self.memtable.entry_count()
    }

    /// Get the number of table files
    pub fn table_count(&self) -> usize {
        self.tables.table_count()
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Exclusive advisory lock on the store's `LOCK` file
///
/// The file itself stays on disk; the lock lives as long as the open handle,
/// so the OS drops it when the owner exits, however it exits.
struct DirLock {
    _file: File,
}

impl DirLock {
    fn acquire(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        if !FileExt::try_lock_exclusive(&file)? {
            return Err(PageBenchError::Storage(format!(
                "store directory is locked by another process ({})",
                path.display()
            )));
        }

        // Holder's pid, for humans inspecting the directory
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self { _file: file })
    }
}
