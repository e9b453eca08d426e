//! Table Iterator
//!
//! Sequential iteration over all entries in a table.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::error::{PageBenchError, Result};

use super::HEADER_SIZE;

/// Iterator over table entries in sorted key order
pub struct TableIterator<'a> {
    file: &'a mut BufReader<File>,
    /// Stop reading when we reach this offset (start of index block)
    end_offset: u64,
    current_offset: u64,
}

impl<'a> TableIterator<'a> {
    /// Create a new iterator starting from the data block
    pub(super) fn new(file: &'a mut BufReader<File>, end_offset: u64) -> Result<Self> {
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        Ok(Self {
            file,
            end_offset,
            current_offset: HEADER_SIZE,
        })
    }

    fn read_entry(&mut self) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut header = [0u8; 8];
        self.file.read_exact(&mut header)?;

        let key_len = u32::from_le_bytes(header[0..4].try_into().unwrap()) as usize;
        let val_len = u32::from_le_bytes(header[4..8].try_into().unwrap()) as usize;

        let mut key = vec![0u8; key_len];
        self.file.read_exact(&mut key)?;

        let mut value = vec![0u8; val_len];
        self.file.read_exact(&mut value)?;

        self.current_offset += 8 + key_len as u64 + val_len as u64;
        Ok((key, value))
    }
}

impl<'a> Iterator for TableIterator<'a> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_offset >= self.end_offset {
            return None;
        }

        match self.read_entry() {
            Ok(entry) => Some(Ok(entry)),
            Err(e) => {
                // Stop after the first failure
                self.current_offset = self.end_offset;
                Some(Err(match e {
                    PageBenchError::Io(io) => PageBenchError::Storage(format!(
                        "table entry unreadable: {}",
                        io
                    )),
                    other => other,
                }))
            }
        }
    }
}
