//! TLC Monitor - structured results from TLC model checker output
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use tlc_monitor::headless::runner::report_error;
use tlc_monitor::{exit_code, run_headless, RunOptions};
use tlcmon_app::config::{init_config_dir, load_settings, OutputFormat, Settings};
use tlcmon_core::logging;
use tlcmon_core::prelude::*;

/// TLC Monitor - structured results from TLC model checker output
#[derive(Parser, Debug)]
#[command(name = "tlcmon")]
#[command(about = "Follow `tlc -tool` output and report structured results", long_about = None)]
struct Args {
    /// File with captured TLC output (reads stdin when omitted)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Model name used in results (defaults to the file name)
    #[arg(long)]
    model: Option<String>,

    /// Minimum time between streamed snapshots
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Print a plain-text report of the final result instead of NDJSON
    #[arg(long)]
    summary: bool,

    /// Create .tlcmon/config.toml in the current directory and exit
    #[arg(long)]
    init_config: bool,

    /// Directory for log files (defaults to the user data directory)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

impl Args {
    /// Command-line flags take precedence over the config file
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(interval_ms) = self.interval_ms {
            settings.updates.interval_ms = interval_ms;
        }
        if self.summary {
            settings.output.format = OutputFormat::Summary;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize error handling
    color_eyre::install().map_err(|e| Error::Setup(format!("error reporting: {}", e)))?;

    // Initialize logging (to file, since stdout carries results)
    let log_dir = logging::init(args.log_dir.as_deref())?;

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if args.init_config {
        init_config_dir(&cwd).context("Creating .tlcmon/config.toml")?;
        eprintln!("Created {}", cwd.join(".tlcmon").join("config.toml").display());
        return Ok(());
    }

    let mut settings = load_settings(&cwd);
    args.apply_to(&mut settings);
    let format = settings.output.format;

    let mut options = RunOptions::new(args.path.clone(), settings);
    if let Some(model) = args.model {
        options.model_name = model;
    }

    match run_headless(options).await {
        Ok(result) => {
            info!("TLC Monitor exiting");
            std::process::exit(exit_code(result.state));
        }
        Err(e) => {
            error!("Application error: {:?}", e);
            report_error(format, &e);
            eprintln!("Logs: {}", log_dir.display());
            std::process::exit(1);
        }
    }
}
