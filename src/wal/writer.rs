//! WAL Writer
//!
//! Handles appending entries to the WAL file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::config::WalSyncStrategy;
use crate::error::{PageBenchError, Result};
use super::{WalEntry, WalReader};

/// Writes entries to the WAL file
pub struct WalWriter {
    file: File,
    /// LSN assigned to the next append
    next_lsn: u64,
    sync_strategy: WalSyncStrategy,
    /// Entries written since the last fsync
    unsynced: usize,
}

impl WalWriter {
    /// Open or create a WAL file
    ///
    /// LSNs continue after the last valid entry already in the file. A
    /// corrupt record ends the scan; I/O errors are returned.
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        let mut last_lsn = 0;
        let mut reader = WalReader::open(path)?;
        loop {
            match reader.next_entry() {
                Ok(Some(entry)) => last_lsn = entry.lsn,
                Ok(None) | Err(PageBenchError::WalCorruption(_)) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(Self {
            file,
            next_lsn: last_lsn + 1,
            sync_strategy,
            unsynced: 0,
        })
    }

    /// Append a put to the WAL, returning its LSN
    pub fn append(&mut self, key: &[u8], value: &[u8]) -> Result<u64> {
        let lsn = self.next_lsn;
        let entry = WalEntry::new(lsn, key.to_vec(), value.to_vec());
        let bytes = entry.serialize()?;

        self.file.write_all(&bytes)?;
        self.next_lsn += 1;
        self.unsynced += 1;

        match self.sync_strategy {
            WalSyncStrategy::EveryWrite => self.sync()?,
            WalSyncStrategy::EveryNEntries { count } => {
                if self.unsynced >= count {
                    self.sync()?;
                }
            }
        }

        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Drop all entries (they are durable elsewhere). LSNs keep counting.
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.sync_all()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Get the LSN the next append will receive
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }

    /// Entries written but not yet fsynced
    pub fn unsynced(&self) -> usize {
        self.unsynced
    }
}
