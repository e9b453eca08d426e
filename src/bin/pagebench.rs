//! pagebench Binary
//!
//! Hashes a file page by page into the embedded store and reports throughput.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use pagebench::config::{LogLevel, WalSyncStrategy, DEFAULT_PAGE_SIZE, DEFAULT_STORE_DIR};
use pagebench::{pipeline, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// pagebench
#[derive(Parser, Debug)]
#[command(name = "pagebench")]
#[command(about = "Benchmark SHA-256 page hashing into an embedded key-value store")]
#[command(version)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Page size in bytes
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pgsz: usize,

    /// Compression method (0 = gzip, 1 = lz4); validated only
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    cmethod: i64,

    /// Terse output
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    terse: bool,

    /// Log level (0 = error, 1 = warn, 2 = info); RUST_LOG takes precedence
    #[arg(long, default_value_t = 0)]
    loglevel: u8,

    /// Print header
    #[arg(short = 'H', long = "header")]
    print_header: bool,

    /// Store directory
    #[arg(long, default_value = DEFAULT_STORE_DIR)]
    db_dir: PathBuf,

    /// fsync the WAL every N records instead of after each one
    #[arg(long)]
    sync_every: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = LogLevel::from(args.loglevel);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_filter()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(args, log_level) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("pagebench: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, log_level: LogLevel) -> Result<()> {
    let sync_strategy = match args.sync_every {
        Some(count) => WalSyncStrategy::EveryNEntries { count },
        None => WalSyncStrategy::EveryWrite,
    };

    let config = Config::builder()
        .input_path(args.input)
        .page_size(args.pgsz)
        .compress_code(args.cmethod)
        .terse(args.terse)
        .log_level(log_level)
        .print_header(args.print_header)
        .store_dir(args.db_dir)
        .wal_sync_strategy(sync_strategy)
        .build()?;

    println!("Page Size: {}", config.page_size);
    println!("Input file: {}", config.input_path.display());

    let stats = pipeline::run(&config)?;

    println!("{}", stats.summary_line());
    if !config.terse {
        println!("{}", stats.detail_line(&config));
    }

    Ok(())
}
