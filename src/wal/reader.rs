//! WAL Reader
//!
//! Handles reading entries from the WAL file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{PageBenchError, Result};
use super::entry::HEADER_SIZE;
use super::WalEntry;

/// Reads entries from the WAL file
///
/// A torn record at the end of the file (partial header or partial data)
/// ends iteration cleanly; `has_torn_tail()` reports it afterwards.
pub struct WalReader {
    reader: BufReader<File>,
    /// Offset just past the last complete, valid entry
    position: u64,
    torn_tail: bool,
    done: bool,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
            torn_tail: false,
            done: false,
        })
    }

    /// Read the next entry from the WAL
    ///
    /// Returns `Ok(None)` at end of file or at a torn tail, and
    /// `Err(WalCorruption)` for a complete record that fails validation.
    pub fn next_entry(&mut self) -> Result<Option<WalEntry>> {
        if self.done {
            return Ok(None);
        }

        let mut header = [0u8; HEADER_SIZE];
        let got = self.read_fully(&mut header)?;
        if got == 0 {
            self.done = true;
            return Ok(None);
        }
        if got < HEADER_SIZE {
            self.torn_tail = true;
            self.done = true;
            return Ok(None);
        }

        let (lsn, crc, len) = WalEntry::parse_header(&header).map_err(|e| {
            self.done = true;
            e
        })?;

        let mut payload = vec![0u8; len as usize];
        let got = self.read_fully(&mut payload)?;
        if got < payload.len() {
            self.torn_tail = true;
            self.done = true;
            return Ok(None);
        }

        let entry = WalEntry::decode_payload(lsn, crc, len, &payload).map_err(|e| {
            self.done = true;
            e
        })?;

        self.position += (HEADER_SIZE + payload.len()) as u64;
        Ok(Some(entry))
    }

    /// Iterate over all valid entries
    pub fn entries(self) -> WalIterator {
        WalIterator { reader: self }
    }

    /// Offset just past the last valid entry read
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether reading stopped at an incomplete record
    pub fn has_torn_tail(&self) -> bool {
        self.torn_tail
    }

    /// Read until `buf` is full or EOF; returns bytes read
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PageBenchError::Io(e)),
            }
        }
        Ok(filled)
    }
}

/// Iterator over WAL entries
pub struct WalIterator {
    reader: WalReader,
}

impl Iterator for WalIterator {
    type Item = Result<WalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_entry().transpose()
    }
}
