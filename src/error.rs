//! Error types for Freelancy.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Project {0} not found")]
    ProjectNotFound(u32),

    #[error("Task {task_id} not found in project {project_id}")]
    TaskNotFound { project_id: u32, task_id: u32 },

    #[error("Failed to access data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file {} is not a valid dataset: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No {0} ids left to assign")]
    IdExhausted(&'static str),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors caused by a project or task id that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProjectNotFound(_) | Self::TaskNotFound { .. })
    }
}
