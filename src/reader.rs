//! Sequential Page Reader
//!
//! Reads a file front to back in fixed-size pages through one reused buffer.
//!
//! ## Short reads
//! `next_page` keeps reading until the page buffer is full or the file is
//! exhausted, so page boundaries always fall on multiples of the page size.
//! The yielded slice is cut to the bytes actually read: a short final page
//! never carries bytes left over from the previous, longer page.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::error::{PageBenchError, Result};

/// One page of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a> {
    /// 0-based page number
    pub index: u64,
    /// Page contents, at most `page_size` bytes
    pub bytes: &'a [u8],
}

impl Page<'_> {
    /// Number of bytes in this page
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Yields consecutive pages of a file until end-of-input
pub struct PageReader {
    path: PathBuf,
    file: File,
    /// Size from filesystem metadata at open time
    file_size: u64,
    buf: Vec<u8>,
    next_index: u64,
    bytes_read: u64,
    exhausted: bool,
}

impl PageReader {
    /// Open `path` for page-sized reads
    ///
    /// Fails with a `Config` error for a zero page size and with an `Io`
    /// error (`NotFound`, `PermissionDenied`, ...) if the file can't be
    /// opened or stat'ed.
    pub fn open(path: &Path, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(PageBenchError::Config(
                "page size must be greater than zero".to_string(),
            ));
        }

        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            file_size,
            buf: vec![0u8; page_size],
            next_index: 0,
            bytes_read: 0,
            exhausted: false,
        })
    }

    /// Read the next page
    ///
    /// Returns `Ok(None)` once the file is exhausted; every later call also
    /// returns `Ok(None)`.
    pub fn next_page(&mut self) -> Result<Option<Page<'_>>> {
        if self.exhausted {
            return Ok(None);
        }

        let filled = self.fill_buffer()?;
        if filled < self.buf.len() {
            self.exhausted = true;
        }
        if filled == 0 {
            return Ok(None);
        }

        let index = self.next_index;
        self.next_index += 1;
        self.bytes_read += filled as u64;

        Ok(Some(Page {
            index,
            bytes: &self.buf[..filled],
        }))
    }

    /// Fill the page buffer from the current position, stopping early only
    /// at end-of-input
    fn fill_buffer(&mut self) -> Result<usize> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.file.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PageBenchError::Io(e)),
            }
        }
        Ok(filled)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Total file size captured from metadata at open time
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Configured page size
    pub fn page_size(&self) -> usize {
        self.buf.len()
    }

    /// Pages yielded so far
    pub fn pages_read(&self) -> u64 {
        self.next_index
    }

    /// Bytes yielded so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Path this reader was opened on
    pub fn path(&self) -> &Path {
        &self.path
    }
}
