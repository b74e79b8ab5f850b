use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Project;

/// Everything persisted in one data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub projects: Vec<Project>,
    /// Highest project id ever handed out. Deleting projects never lowers it.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub last_project_id: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// A JSON document on disk holding the whole [`Dataset`].
///
/// Every save rewrites the file in full. Writes are not atomic: a failure halfway
/// through can leave a truncated document behind.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the dataset, creating an empty one on first run.
    ///
    /// Only a missing file counts as first run. Any other read error, and any
    /// document that fails to parse, is returned to the caller.
    pub fn load_or_init(&self) -> Result<Dataset> {
        match self.load() {
            Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent).map_err(|source| Error::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
                tracing::info!("Creating new data file at {}", self.path.display());
                let dataset = Dataset::default();
                self.save(&dataset)?;
                Ok(dataset)
            }
            result => result,
        }
    }

    pub fn load(&self) -> Result<Dataset> {
        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&content).map_err(|source| self.format_error(source))
    }

    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        let content =
            serde_json::to_string_pretty(dataset).map_err(|source| self.format_error(source))?;
        fs::write(&self.path, content).map_err(|source| self.io_error(source))?;
        tracing::debug!(
            "Saved {} projects to {}",
            dataset.projects.len(),
            self.path.display()
        );
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn format_error(&self, source: serde_json::Error) -> Error {
        Error::Format {
            path: self.path.clone(),
            source,
        }
    }
}
