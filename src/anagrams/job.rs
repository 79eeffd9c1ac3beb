use super::{anagram_pair, candidates};
use crate::error::{ErrorExt, PipelineError, Result};
use crate::pipeline::{Job, Pair, PairStream};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One text file turned into `(signature, word)` pairs, line by line
#[derive(Debug, Clone)]
pub struct FileJob {
    path: PathBuf,
    min_token_length: usize,
}

impl FileJob {
    pub fn new(path: impl Into<PathBuf>, min_token_length: usize) -> Self {
        Self {
            path: path.into(),
            min_token_length,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Job<String, String> for FileJob {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn execute(self: Box<Self>) -> Result<PairStream<String, String>> {
        let id = self.id();
        let file = File::open(&self.path).to_job_error("cannot open input file", &id)?;
        let min_token_length = self.min_token_length;

        let pairs = BufReader::new(file)
            .lines()
            .flat_map(move |line| -> Vec<Result<Pair<String, String>>> {
                match line {
                    Ok(line) => candidates(&line, min_token_length)
                        .map(|token| Ok(anagram_pair(token)))
                        .collect(),
                    Err(e) => vec![Err(PipelineError::from(e).into_job_error(&id))],
                }
            });
        Ok(Box::new(pairs))
    }
}
