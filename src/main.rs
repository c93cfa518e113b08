//! # Main — CLI Entry Point
//!
//! Routes subcommands to the engine paths. The `sequential` and `parallel`
//! subcommands run one path each; `compare` runs both back-to-back, checks
//! that the outputs agree, and reports the speedup.
//!
//! ## Global Options
//!
//! - `--workers` / `PRIMESPAN_WORKERS`: worker thread count (0 = all cores).
//! - `--timeout-secs`: bound on the aggregator's wait for worker results.
//! - `--json`: machine-readable run summaries on stdout.
//! - `LOG_FORMAT=json`: JSON logs for structured collection, human-readable
//!   to stderr otherwise.

mod cli;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "primespan", about = "Find all primes up to a bound with partitioned worker scans")]
struct Cli {
    /// Worker threads for parallel scans (0 = all logical cores)
    #[arg(long, env = "PRIMESPAN_WORKERS", default_value_t = 0)]
    workers: usize,

    /// Seconds the aggregator waits for worker results before failing
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Emit machine-readable JSON summaries instead of human-readable output
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find primes with the single-threaded reference path
    Sequential {
        /// Upper bound N (inclusive)
        #[arg(long)]
        limit: u64,
    },
    /// Find primes with the partitioned worker pipeline
    Parallel {
        /// Upper bound N (inclusive)
        #[arg(long)]
        limit: u64,
        /// Result hand-off: "shared" (mutex accumulator) or "channel" (message passing)
        #[arg(long, default_value = "shared")]
        transport: String,
    },
    /// Run both paths, check they agree, and report the speedup
    Compare {
        /// Upper bound N (inclusive)
        #[arg(long)]
        limit: u64,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Structured logging: LOG_FORMAT=json for collection, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.timeout_secs);

    match &cli.command {
        Commands::Sequential { limit } => cli::run_sequential_cmd(*limit, cli.json),
        Commands::Parallel { limit, transport } => {
            cli::run_parallel_cmd(*limit, cli.workers, transport, timeout, cli.json)
        }
        Commands::Compare { limit } => cli::run_compare_cmd(*limit, cli.workers, timeout, cli.json),
    }
}
