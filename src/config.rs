//! Configuration for pagebench
//!
//! Centralized configuration with sensible defaults. Built once from the
//! command line and passed by reference; nothing here is process-global.

use std::path::PathBuf;

use crate::error::{PageBenchError, Result};

/// Default page size in bytes
pub const DEFAULT_PAGE_SIZE: usize = 8192;

/// Default store directory
pub const DEFAULT_STORE_DIR: &str = "/tmp/pagebench";

/// Table files allowed before they are merged into one
pub const DEFAULT_MAX_TABLES: usize = 4;

/// Main configuration for a benchmark run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Input Configuration
    // -------------------------------------------------------------------------
    /// File whose pages are hashed
    pub input_path: PathBuf,

    /// Page size in bytes (always > 0 once built)
    pub page_size: usize,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Compression method selector. Validated, never applied to page data.
    pub compress_method: CompressMethod,

    /// Terse console output
    pub terse: bool,

    /// Log verbosity when RUST_LOG is not set
    pub log_level: LogLevel,

    /// Print-header toggle. Carried for CLI compatibility only.
    pub print_header: bool,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    pub store: StoreConfig,
}

/// Configuration for the embedded store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for all store files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── LOCK             (flock'd while open)
    ///     ├── wal.log          (write-ahead log)
    ///     └── tables/          (sorted table files)
    pub data_dir: PathBuf,

    /// Sync strategy: how often to fsync WAL
    pub wal_sync_strategy: WalSyncStrategy,

    /// Max size of memtable before flush (in bytes)
    pub memtable_size_limit: usize,

    /// Table count above which all tables are compacted into one
    pub max_tables: usize,
}

/// WAL sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N uncommitted entries (balanced durability/performance)
    EveryNEntries { count: usize },
}

/// Compression method codes accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressMethod {
    Gzip = 0,
    Lz4 = 1,
}

impl TryFrom<i64> for CompressMethod {
    type Error = PageBenchError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(CompressMethod::Gzip),
            1 => Ok(CompressMethod::Lz4),
            other => Err(PageBenchError::Config(format!(
                "Wrong compression method supplied: {} (expected 0 or 1)",
                other
            ))),
        }
    }
}

/// Log verbosity levels accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
}

impl From<u8> for LogLevel {
    /// Levels above 2 saturate at Info
    fn from(level: u8) -> Self {
        match level {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            _ => LogLevel::Info,
        }
    }
}

impl LogLevel {
    /// Directive string for a tracing EnvFilter
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_STORE_DIR),
            wal_sync_strategy: WalSyncStrategy::EveryWrite,
            memtable_size_limit: 4 * 1024 * 1024, // 4 MB
            max_tables: DEFAULT_MAX_TABLES,
        }
    }
}

impl StoreConfig {
    /// Store config rooted at `data_dir`, defaults elsewhere
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
///
/// Holds raw values as they arrive from the command line; `build()` is the
/// only place they are validated.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    input_path: Option<PathBuf>,
    page_size: usize,
    compress_code: i64,
    terse: bool,
    log_level: LogLevel,
    print_header: bool,
    store: StoreConfig,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            input_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            compress_code: CompressMethod::Gzip as i64,
            terse: true,
            log_level: LogLevel::Error,
            print_header: false,
            store: StoreConfig::default(),
        }
    }
}

impl ConfigBuilder {
    /// Set the input file
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the page size (in bytes)
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the raw compression method code
    pub fn compress_code(mut self, code: i64) -> Self {
        self.compress_code = code;
        self
    }

    /// Set terse output
    pub fn terse(mut self, terse: bool) -> Self {
        self.terse = terse;
        self
    }

    /// Set the log level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set the print-header toggle
    pub fn print_header(mut self, print_header: bool) -> Self {
        self.print_header = print_header;
        self
    }

    /// Set the store directory
    pub fn store_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.data_dir = path.into();
        self
    }

    /// Set the WAL sync strategy
    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.store.wal_sync_strategy = strategy;
        self
    }

    /// Set the memtable size limit (in bytes)
    pub fn memtable_size_limit(mut self, size: usize) -> Self {
        self.store.memtable_size_limit = size;
        self
    }

    /// Set how many tables may pile up before compaction
    pub fn max_tables(mut self, count: usize) -> Self {
        self.store.max_tables = count;
        self
    }

    /// Validate and build. Touches no files.
    pub fn build(self) -> Result<Config> {
        let compress_method = CompressMethod::try_from(self.compress_code)?;

        let input_path = self
            .input_path
            .ok_or_else(|| PageBenchError::Config("missing input file".to_string()))?;

        if self.page_size == 0 {
            return Err(PageBenchError::Config(
                "page size must be greater than zero".to_string(),
            ));
        }

        if let WalSyncStrategy::EveryNEntries { count: 0 } = self.store.wal_sync_strategy {
            return Err(PageBenchError::Config(
                "WAL sync interval must be greater than zero".to_string(),
            ));
        }

        if self.store.max_tables == 0 {
            return Err(PageBenchError::Config(
                "max tables must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            input_path,
            page_size: self.page_size,
            compress_method,
            terse: self.terse,
            log_level: self.log_level,
            print_header: self.print_header,
            store: self.store,
        })
    }
}
