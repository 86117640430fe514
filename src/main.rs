//! tailchart CLI
//!
//! Tails a newline-delimited JSON file and charts author counts and
//! sentiment trends as lines arrive.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tailchart::cli::{handle_consume, ConsumeArgs, ConsumerConfig};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tailchart")]
#[command(about = "Tail a JSON-lines file and chart author counts and sentiment live")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    args: ConsumeArgs,
}

fn env_filter() -> EnvFilter {
    // RUST_LOG overrides, e.g. RUST_LOG=debug tailchart --headless
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tailchart=info"))
}

/// Headless mode logs to stderr; the dashboard owns the terminal, so it logs to a file.
fn init_logging(config: &ConsumerConfig) -> Result<()> {
    if config.logs_to_stderr() {
        fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter())
            .with_target(false)
            .with_thread_ids(false)
            .init();
        return Ok(());
    }

    if let Some(dir) = config.log_file.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log folder {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConsumerConfig::from_args(&cli.args)?;

    init_logging(&config)?;

    if let Err(e) = handle_consume(&config) {
        // Already logged; repeat it on stderr only when the log went to a file
        if !config.logs_to_stderr() {
            eprintln!("❌ {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
