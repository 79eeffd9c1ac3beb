//! # anagram-pipeline
//!
//! A small batch map-group-reduce pipeline and an anagram counter built on it.
//!
//! ## Usage
//!
//! ```bash
//! anagram-pipeline <ROOT> [-o output/count_anagrams.txt] [-j workers] [--timeout 30s]
//! ```
//!
//! ## Modules
//!
//! - `pipeline` - Pairs, jobs, strategies, grouping and the scheduler
//! - `anagrams` - File jobs and the directory-walking anagram strategy
//! - `config` - TOML configuration with command line overrides
//! - `cli` - Argument parsing and the command handler
//! - `error` - Unified error type with codes and exit statuses
pub mod anagrams;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;


pub use error::{PipelineError, Result};
