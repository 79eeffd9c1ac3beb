use super::job::FileJob;
use super::{DEFAULT_EXTENSION, DEFAULT_MIN_TOKEN_LENGTH};
use crate::config::PipelineConfig;
use crate::error::{common, ErrorExt, PipelineError, Result};
use crate::pipeline::{BoxedJob, GroupedResult, JobStream, Strategy};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Walks a directory tree for text files and writes `signature,count` lines
#[derive(Debug, Clone)]
pub struct AnagramStrategy {
    root: PathBuf,
    output_path: PathBuf,
    extension: String,
    min_token_length: usize,
}

impl AnagramStrategy {
    pub fn new(root: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_path: output_path.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &PipelineConfig) -> Self {
        Self::new(root, &config.output)
            .with_extension(&config.extension)
            .with_min_token_length(config.min_token_length)
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.min_token_length = min_token_length;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn check_root(&self) -> Result<()> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(common::root_not_directory(&self.root)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(common::root_not_found(&self.root))
            }
            Err(e) => Err(PipelineError::from(e).with_context(self.root.display())),
        }
    }
}

/// Regular files, plus symlinks that resolve to one. Linked directories are
/// not descended into.
fn is_input_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file())
}

impl Strategy<String, String> for AnagramStrategy {
    fn name(&self) -> String {
        "anagrams".to_string()
    }

    fn emit(&self) -> Result<JobStream<String, String>> {
        self.check_root()?;
        debug!(root = %self.root.display(), extension = %self.extension, "Walking input tree");

        let extension = self.extension.clone();
        let min_token_length = self.min_token_length;
        let jobs = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    None
                }
            })
            .filter(move |entry| {
                is_input_file(entry)
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext == extension.as_str())
            })
            .map(move |entry| {
                trace!(path = %entry.path().display(), "Emitting job");
                Box::new(FileJob::new(entry.into_path(), min_token_length)) as BoxedJob<_, _>
            });

        Ok(Box::new(jobs))
    }

    fn output(&self, grouped: GroupedResult<String, String>) -> Result<()> {
        let path = &self.output_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .to_output_error("cannot create output directory", Some(parent.to_path_buf()))?;
        }

        let file = File::create(path)
            .to_output_error("cannot create output file", Some(path.clone()))?;
        let mut writer = BufWriter::new(file);
        for (key, count) in grouped.counts() {
            writeln!(writer, "{},{}", key, count)
                .to_output_error("cannot write output line", Some(path.clone()))?;
        }
        writer
            .flush()
            .to_output_error("cannot flush output file", Some(path.clone()))?;

        info!(path = %path.display(), keys = grouped.len(), "Wrote anagram counts");
        Ok(())
    }
}
