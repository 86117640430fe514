//! Consume command - tail the data file and chart it until interrupted

use crate::aggregate::Summary;
use crate::cli::output::format_summary;
use crate::consumer::Consumer;
use crate::infra::tailer::{StartAt, Tailer};
use crate::render::LogRenderer;
use crate::tui::{init_terminal, restore_terminal, KeyWait, TerminalChart};
use crate::wait::SignalWait;
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

pub const DATA_FOLDER: &str = "data";
pub const DATA_FILE_NAME: &str = "project_live.json";
pub const LOG_FOLDER: &str = "logs";
pub const LOG_FILE_NAME: &str = "tailchart.log";

/// Consume command arguments
#[derive(Args, Debug, Clone)]
pub struct ConsumeArgs {
    /// Data file to tail (default: <root>/data/project_live.json)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Project root (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Delay between polls when no new line is available, in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: u64,

    /// Log counts instead of drawing the terminal dashboard
    #[arg(long)]
    pub headless: bool,

    /// Replay the lines already in the file before tailing
    #[arg(long)]
    pub from_start: bool,

    /// Log file used while the dashboard owns the terminal (default: <root>/logs/tailchart.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the exit summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for ConsumeArgs {
    fn default() -> Self {
        Self {
            file: None,
            root: None,
            poll_interval_ms: 500,
            headless: false,
            from_start: false,
            log_file: None,
            json: false,
        }
    }
}

/// Settings resolved from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerConfig {
    pub project_root: PathBuf,
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub poll_interval: Duration,
    pub start: StartAt,
    pub headless: bool,
    pub json: bool,
}

impl ConsumerConfig {
    pub fn from_args(args: &ConsumeArgs) -> Result<Self> {
        let project_root = match &args.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        Ok(Self::resolve(args, project_root))
    }

    /// Resolve paths relative to an explicit project root.
    pub fn resolve(args: &ConsumeArgs, project_root: PathBuf) -> Self {
        let data_file = args
            .file
            .clone()
            .unwrap_or_else(|| project_root.join(DATA_FOLDER).join(DATA_FILE_NAME));
        let log_file = args
            .log_file
            .clone()
            .unwrap_or_else(|| project_root.join(LOG_FOLDER).join(LOG_FILE_NAME));
        let start = if args.from_start { StartAt::Beginning } else { StartAt::End };

        Self {
            project_root,
            data_file,
            log_file,
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            start,
            headless: args.headless,
            json: args.json,
        }
    }

    pub fn data_folder(&self) -> &Path {
        self.data_file.parent().unwrap_or(self.project_root.as_path())
    }

    /// Whether log output reaches the user's stderr; the dashboard logs to a file.
    pub fn logs_to_stderr(&self) -> bool {
        self.headless
    }
}

/// Run the consumer until the user interrupts it.
///
/// Fails before touching the terminal when the data file is missing.
/// Every returned error has already been logged.
pub fn handle_consume(config: &ConsumerConfig) -> Result<()> {
    info!("START consumer.");
    info!("Project root: {}", config.project_root.display());
    info!("Data folder: {}", config.data_folder().display());
    info!("Data file: {}", config.data_file.display());

    let tailer = match Tailer::open_at(&config.data_file, config.start) {
        Ok(tailer) => tailer,
        Err(e) => {
            error!("{}. Exiting.", e);
            return Err(e.into());
        }
    };

    let outcome = if config.headless {
        run_headless(tailer, config)
    } else {
        run_dashboard(tailer, config)
    };
    // Loop failures are logged by the consumer; these are setup and teardown errors
    let (result, summary) = outcome.map_err(|e| {
        error!("{:#}", e);
        e
    })?;

    println!("{}", format_summary(&summary, config.json));
    result
}

fn run_headless(tailer: Tailer, config: &ConsumerConfig) -> Result<(Result<()>, Summary)> {
    let waiter = SignalWait::install()?;
    let mut consumer = Consumer::new(tailer, LogRenderer::new(), waiter).with_poll_interval(config.poll_interval);
    println!("Consumer is ready and waiting for new JSON messages...");

    let result = consumer.run();
    let summary = consumer.store().snapshot().summary();
    Ok((result, summary))
}

fn run_dashboard(tailer: Tailer, config: &ConsumerConfig) -> Result<(Result<()>, Summary)> {
    let source = config.data_file.display().to_string();
    let mut terminal = init_terminal()?;
    if let Err(e) = terminal.clear() {
        restore_terminal(&mut terminal)?;
        return Err(e.into());
    }

    let chart = TerminalChart::new(terminal, source);
    let mut consumer = Consumer::new(tailer, chart, KeyWait).with_poll_interval(config.poll_interval);

    let result = consumer.run();

    let (store, chart) = consumer.into_parts();
    let mut terminal = chart.into_terminal();
    restore_terminal(&mut terminal)?;

    Ok((result, store.snapshot().summary()))
}
