//! CLI argument structures

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Count anagram classes across the text files of a directory tree
#[derive(Parser, Debug)]
#[command(name = "anagram-pipeline")]
#[command(about = "Count anagram classes across the text files of a directory tree", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory to search for input files
    pub root: PathBuf,

    /// Output file, one `signature,count` line per anagram class
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Extension of the input files, without the dot
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Only count words longer than this many characters
    #[arg(short = 'm', long = "min-length", value_name = "N")]
    pub min_length: Option<usize>,

    /// Number of files processed at the same time
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Give up on a single file after this long (e.g. "30s", "2m")
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Abort the whole run when one file cannot be read
    #[arg(long)]
    pub fail_fast: bool,

    /// TOML configuration file; flags override its values
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show a progress bar while files are processed
    #[arg(long)]
    pub progress: bool,

    /// Print a run report to stdout when done
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub report: Option<ReportFormat>,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}
