//! CLI command handling
//!
//! Turns parsed arguments into a configuration, wires the anagram strategy
//! into a scheduler, runs it and prints the optional report.

pub mod args;

pub use args::{Cli, ReportFormat};

use crate::anagrams::AnagramStrategy;
use crate::config::{ConfigLoader, ConfigOverrides};
use crate::pipeline::{RunReport, Scheduler};
use anyhow::Result;
use tracing::{debug, warn};

/// Get the log filter based on verbosity
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,tokio=debug", // -vvv shows everything including dependencies
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output: self.output.clone(),
            extension: self.extension.clone(),
            min_token_length: self.min_length,
            workers: self.workers,
            job_timeout: self.timeout,
            fail_fast: self.fail_fast,
        }
    }
}

/// Execute one pipeline run as described by the command line
pub async fn execute(cli: &Cli) -> Result<RunReport> {
    let config = ConfigLoader::load(cli.config.as_deref(), &cli.overrides()).await?;
    debug!(root = %cli.root.display(), "Configuration loaded");

    let strategy = AnagramStrategy::from_config(&cli.root, &config);
    let scheduler =
        Scheduler::new(strategy).with_options(config.scheduler_options(cli.progress));
    let report = scheduler.run().await?;

    if let Some(err) = &report.emission_error {
        warn!("No input files were processed: {}", err);
    }
    if let Some(format) = cli.report {
        print_report(&report, format)?;
    }
    Ok(report)
}

fn print_report(report: &RunReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
