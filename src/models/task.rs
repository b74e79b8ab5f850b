use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A unit of work inside a project.
///
/// `id` is only unique within the owning project's task list; `project_id` points back
/// at that project. `completed_date` is present exactly when `status` is `Done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub project_id: u32,
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub status: TaskStatus,
    /// Date the task was finished, as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The progress status of a task.
///
/// - `Waiting`: Not started
/// - `InProgress`: Being worked on
/// - `Done`: Finished
///
/// Statuses advance cyclically: `Waiting → InProgress → Done → Waiting`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[default]
    Waiting,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Waiting, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// The status that follows this one in the progress cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Waiting => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Waiting,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Waiting" | "waiting" => Ok(Self::Waiting),
            "In Progress" | "in_progress" | "in-progress" => Ok(Self::InProgress),
            "Done" | "done" => Ok(Self::Done),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// Input for creating a new task within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: String,
    /// Deadline as `YYYY-MM-DD`.
    pub deadline: String,
}
