//! Table Reader
//!
//! Opens table files and provides O(log n) key lookups via in-memory index.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{PageBenchError, Result};

use super::iterator::TableIterator;
use super::{FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Reader for table files with in-memory index for O(log n) lookups
pub struct TableReader {
    path: PathBuf,
    file: BufReader<File>,
    /// In-memory index: key → file offset
    index: BTreeMap<Vec<u8>, u64>,
    entry_count: u64,
    /// Index block starting offset (end of data block)
    index_offset: u64,
}

impl TableReader {
    /// Open a table for reading
    ///
    /// Validates header and data checksum, then loads the index into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(PageBenchError::Storage(format!(
                "Table {} too short: {} bytes",
                path.display(),
                file_size
            )));
        }

        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(PageBenchError::Storage(format!(
                "Invalid table magic: expected PGBT, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes(header[4..6].try_into().unwrap());
        if version != VERSION {
            return Err(PageBenchError::Storage(format!(
                "Unsupported table version: {}",
                version
            )));
        }

        let entry_count = u64::from_le_bytes(header[6..14].try_into().unwrap());

        file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
        let mut footer = [0u8; FOOTER_SIZE as usize];
        file.read_exact(&mut footer)?;

        let index_offset = u64::from_le_bytes(footer[0..8].try_into().unwrap());
        let data_crc = u32::from_le_bytes(footer[8..12].try_into().unwrap());

        if index_offset < HEADER_SIZE || index_offset > file_size - FOOTER_SIZE {
            return Err(PageBenchError::Storage(format!(
                "Table {} has index offset {} outside the file",
                path.display(),
                index_offset
            )));
        }

        // Check the data block against the footer checksum
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        let mut data = vec![0u8; (index_offset - HEADER_SIZE) as usize];
        file.read_exact(&mut data)?;
        if crc32fast::hash(&data) != data_crc {
            return Err(PageBenchError::Storage(format!(
                "Table {} data checksum mismatch",
                path.display()
            )));
        }
        drop(data);

        // Index block size = file_size - footer_size - index_offset
        let index_block_size = file_size - FOOTER_SIZE - index_offset;
        let mut index_data = vec![0u8; index_block_size as usize];
        file.read_exact(&mut index_data)?;

        // Parse index entries: [key_len(4)][offset(8)][key]
        let mut index = BTreeMap::new();
        let mut pos = 0;
        while pos < index_data.len() {
            if pos + 12 > index_data.len() {
                return Err(Self::bad_index(path));
            }
            let key_len =
                u32::from_le_bytes(index_data[pos..pos + 4].try_into().unwrap()) as usize;
            let offset = u64::from_le_bytes(index_data[pos + 4..pos + 12].try_into().unwrap());
            pos += 12;

            if pos + key_len > index_data.len() {
                return Err(Self::bad_index(path));
            }
            index.insert(index_data[pos..pos + key_len].to_vec(), offset);
            pos += key_len;
        }

        if index.len() as u64 != entry_count {
            return Err(PageBenchError::Storage(format!(
                "Table {} header claims {} entries, index has {}",
                path.display(),
                entry_count,
                index.len()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file: BufReader::new(file),
            index,
            entry_count,
            index_offset,
        })
    }

    fn bad_index(path: &Path) -> PageBenchError {
        PageBenchError::Storage(format!("Table {} has a malformed index", path.display()))
    }

    /// Get a value by key: O(log n) lookup via in-memory index
    ///
    /// Returns `Ok(None)` if the key is not in this table.
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let offset = match self.index.get(key) {
            Some(&off) => off,
            None => return Ok(None),
        };

        self.file.seek(SeekFrom::Start(offset))?;

        let mut header = [0u8; 8];
        self.file.read_exact(&mut header)?;

        let key_len = u32::from_le_bytes(header[0..4].try_into().unwrap()) as usize;
        let val_len = u32::from_le_bytes(header[4..8].try_into().unwrap()) as usize;

        // Skip the key (the index already matched it)
        self.file.seek(SeekFrom::Current(key_len as i64))?;

        let mut value = vec![0u8; val_len];
        self.file.read_exact(&mut value)?;

        Ok(Some(value))
    }

    /// Get entry count
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Quick check if a key might be in this table (range check)
    pub fn might_contain(&self, key: &[u8]) -> bool {
        match (self.index.keys().next(), self.index.keys().next_back()) {
            (Some(min), Some(max)) => key >= min.as_slice() && key <= max.as_slice(),
            _ => false,
        }
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an iterator over all entries in key order
    pub fn iter(&mut self) -> Result<TableIterator<'_>> {
        TableIterator::new(&mut self.file, self.index_offset)
    }
}
