//! Common test utilities and helpers

#![allow(dead_code)]

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test context builder for setting up an input corpus
pub struct CorpusBuilder {
    temp_dir: TempDir,
    files: Vec<(PathBuf, Vec<u8>)>,
}

impl CorpusBuilder {
    /// Create a new corpus builder
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            files: Vec::new(),
        })
    }

    /// Add a text file under the corpus root
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), content.as_bytes().to_vec()));
        self
    }

    /// Add a file whose content is not valid UTF-8, so reading it fails
    pub fn with_unreadable_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), b"tier\n\xff\xfe\xfa\n".to_vec()));
        self
    }

    /// Build the corpus on disk
    pub fn build(self) -> Result<Corpus> {
        let root = self.temp_dir.path().join("corpus");
        fs::create_dir_all(&root)?;

        for (file_path, content) in self.files {
            let full_path = root.join(file_path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full_path, content)?;
        }

        Ok(Corpus {
            temp_dir: self.temp_dir,
            root,
        })
    }
}

/// An input tree plus a scratch area for outputs
pub struct Corpus {
    temp_dir: TempDir,
    root: PathBuf,
}

impl Corpus {
    /// Directory holding the input files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A path outside the corpus root, for output artifacts
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Parse `key,count` lines into a map, failing on malformed lines
pub fn read_counts(path: impl AsRef<Path>) -> Result<HashMap<String, usize>> {
    let content = fs::read_to_string(path)?;
    let mut counts = HashMap::new();
    for line in content.lines() {
        let (key, count) = line
            .rsplit_once(',')
            .ok_or_else(|| anyhow::anyhow!("malformed line: {line}"))?;
        counts.insert(key.to_string(), count.parse()?);
    }
    Ok(counts)
}
