//! Throughput Pipeline
//!
//! Reads pages, hashes them and stores each digest under its page index,
//! then reports how long it took.
//!
//! ## Stages
//! ```text
//! Init ──▶ Reading ──▶ Reporting ──▶ Done
//!            │  ▲
//!            ▼  │
//!      HashOne ─▶ StoreOne
//! ```
//!
//! Strictly sequential: one page is read, hashed and stored before the next
//! read starts. Any reader or store failure ends the run; the store handle
//! is still released on the way out.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::digest::digest;
use crate::error::Result;
use crate::human;
use crate::index::PageIndex;
use crate::reader::PageReader;

/// Statistics for one finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Pages hashed and stored
    pub pages: u64,
    /// Input size from file metadata at open time
    pub file_size: u64,
    /// Bytes actually hashed
    pub bytes_hashed: u64,
    /// Wall-clock time from first read to last store
    pub elapsed: Duration,
}

impl RunStats {
    /// Average bytes per second over the run
    ///
    /// Uses nanosecond precision so sub-second runs get a real rate; an
    /// elapsed time of zero counts as one nanosecond. An empty file rates 0.
    pub fn rate_per_sec(&self) -> u64 {
        if self.file_size == 0 {
            return 0;
        }
        let nanos = self.elapsed.as_nanos().max(1);
        let rate = self.file_size as u128 * 1_000_000_000 / nanos;
        rate.min(u64::MAX as u128) as u64
    }

    /// One-line console summary
    pub fn summary_line(&self) -> String {
        format!(
            "Computed SHA256 on {} pages FileSz: {} in time {} at rate of {}/sec",
            self.pages,
            human::bytes(self.file_size),
            human::duration(self.elapsed),
            human::bytes(self.rate_per_sec())
        )
    }

    /// Extra line printed when terse output is off
    pub fn detail_line(&self, config: &Config) -> String {
        format!(
            "Store: {} records: {} bytes hashed: {} sync: {:?}",
            config.store.data_dir.display(),
            self.pages,
            self.bytes_hashed,
            config.store.wal_sync_strategy
        )
    }
}

/// Drives reader → digest → index for one file
pub struct Pipeline {
    reader: PageReader,
    index: PageIndex,
}

impl Pipeline {
    /// Take ownership of an open reader and an open index
    pub fn new(reader: PageReader, index: PageIndex) -> Self {
        Self { reader, index }
    }

    /// Process every page, close the store, and return the statistics
    pub fn run(self) -> Result<RunStats> {
        let Pipeline { mut reader, index } = self;

        match Self::process(&mut reader, &index) {
            Ok(stats) => {
                drop(reader);
                index.close()?;
                tracing::info!(
                    pages = stats.pages,
                    file_size = stats.file_size,
                    elapsed_ms = stats.elapsed.as_millis() as u64,
                    rate = stats.rate_per_sec(),
                    "Run complete"
                );
                Ok(stats)
            }
            Err(e) => {
                // Reported once by the caller; this only adds progress context
                tracing::debug!(pages_done = reader.pages_read(), "Run aborted: {}", e);
                // Dropping the index releases the store lock
                Err(e)
            }
        }
    }

    /// Reading loop and reporting
    fn process(reader: &mut PageReader, index: &PageIndex) -> Result<RunStats> {
        let file_size = reader.file_size();
        let mut pages: u64 = 0;

        tracing::info!(
            input = %reader.path().display(),
            page_size = reader.page_size(),
            file_size,
            "Run started"
        );

        let start = Instant::now();

        while let Some(page) = reader.next_page()? {
            let page_digest = digest(page.bytes);
            index.put_page_digest(page.index, &page_digest)?;
            pages += 1;
        }

        let elapsed = start.elapsed();

        Ok(RunStats {
            pages,
            file_size,
            bytes_hashed: reader.bytes_read(),
            elapsed,
        })
    }
}

/// Run the whole benchmark described by `config`
///
/// Opens the input first, then the store, so a bad input path never
/// touches the store directory.
pub fn run(config: &Config) -> Result<RunStats> {
    let reader = PageReader::open(&config.input_path, config.page_size)?;
    let index = PageIndex::open(&config.store)?;

    tracing::debug!(
        compress_method = ?config.compress_method,
        print_header = config.print_header,
        "Options carried but not applied to the data path"
    );

    Pipeline::new(reader, index).run()
}
