//! Table Builder
//!
//! Writes sorted key-value entries to a new table file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{PageBenchError, Result};

use super::{sync_dir, tmp_path, TableInfo, HEADER_SIZE, MAGIC, VERSION};

/// Builder for creating new tables from sorted entries
pub struct TableBuilder {
    /// Final location, only populated by `finish()`
    path: PathBuf,
    /// Where the bytes go until then
    tmp_path: PathBuf,
    writer: BufWriter<File>,
    entry_count: u64,
    /// Current write position (for index)
    current_offset: u64,
    /// Index: key → file offset of entry
    index: Vec<(Vec<u8>, u64)>,
    /// Running CRC hasher for data section
    data_hasher: crc32fast::Hasher,
}

impl TableBuilder {
    /// Create a new table builder
    ///
    /// Writes header immediately; call `add()` in strictly increasing key
    /// order, then `finish()` to write index and footer and move the file
    /// to `path`.
    pub fn new(path: &Path) -> Result<Self> {
        let tmp_path = tmp_path(path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;

        let mut writer = BufWriter::new(file);

        // Entry count is patched in by finish()
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?;

        Ok(Self {
            path: path.to_path_buf(),
            tmp_path,
            writer,
            entry_count: 0,
            current_offset: HEADER_SIZE,
            index: Vec::new(),
            data_hasher: crc32fast::Hasher::new(),
        })
    }

    /// Add a key-value pair (keys must be strictly increasing)
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if let Some((last, _)) = self.index.last() {
            if key <= last.as_slice() {
                return Err(PageBenchError::Storage(format!(
                    "table keys out of order in {}",
                    self.path.display()
                )));
            }
        }

        self.index.push((key.to_vec(), self.current_offset));

        let key_len_bytes = (key.len() as u32).to_le_bytes();
        let val_len_bytes = (value.len() as u32).to_le_bytes();

        for part in [&key_len_bytes[..], &val_len_bytes[..], key, value] {
            self.writer.write_all(part)?;
            self.data_hasher.update(part);
        }

        self.current_offset += 8 + key.len() as u64 + value.len() as u64;
        self.entry_count += 1;

        Ok(())
    }

    /// Finish building: write index block, footer, and return metadata
    pub fn finish(mut self) -> Result<TableInfo> {
        let index_offset = self.current_offset;

        for (key, offset) in &self.index {
            self.writer.write_all(&(key.len() as u32).to_le_bytes())?;
            self.writer.write_all(&offset.to_le_bytes())?;
            self.writer.write_all(key)?;
        }

        let data_crc = self.data_hasher.finalize();

        self.writer.write_all(&index_offset.to_le_bytes())?;
        self.writer.write_all(&data_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?;

        self.writer.flush()?;

        let mut file = self.writer.into_inner().map_err(|e| {
            PageBenchError::Storage(format!("Failed to flush table: {}", e))
        })?;
        file.seek(SeekFrom::Start(6))?; // After magic + version
        file.write_all(&self.entry_count.to_le_bytes())?;
        file.sync_all()?;

        let file_size = file.metadata()?.len();
        drop(file);

        fs::rename(&self.tmp_path, &self.path)?;
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => sync_dir(dir)?,
            _ => sync_dir(Path::new("."))?,
        }

        Ok(TableInfo {
            path: self.path,
            entry_count: self.entry_count,
            file_size,
        })
    }
}
