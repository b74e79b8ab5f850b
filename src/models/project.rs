use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Task;
use crate::error::Error;

/// A freelance project billed to a client.
///
/// Projects are the top-level unit of the dataset. Each one owns its tasks, so deleting
/// a project deletes every task in it. `deadline` is kept as the `YYYY-MM-DD` text the
/// user entered; it doubles as the billing month once the project is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub client: String,
    /// Amount billed for the whole project.
    pub cost: f64,
    pub deadline: String,
    pub status: ProjectStatus,
    /// Files written before projects carried a timestamp load with the load time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
    /// Highest task id ever handed out in this project. Deleting tasks never lowers it.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub last_task_id: u32,
}

impl Project {
    pub fn task(&self, task_id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Reserve the next task id within this project.
    ///
    /// Ids grow past both the recorded high-water mark and any id present in the
    /// task list, so an id freed by a deletion is never handed out again.
    pub fn allocate_task_id(&mut self) -> Result<u32, Error> {
        let id = next_id(self.last_task_id, self.tasks.iter().map(|t| t.id))
            .ok_or(Error::IdExhausted("task"))?;
        self.last_task_id = id;
        Ok(id)
    }
}

/// One past the larger of `last` and every id in `existing`, or `None` on overflow.
pub(crate) fn next_id(last: u32, existing: impl Iterator<Item = u32>) -> Option<u32> {
    existing.fold(last, u32::max).checked_add(1)
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// The billing status of a project.
///
/// - `Active`: Work is ongoing
/// - `Completed`: Delivered; counted as income in its deadline month
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// The other status. Used by the complete/reopen toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Completed,
            Self::Completed => Self::Active,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" | "active" => Ok(Self::Active),
            "Completed" | "completed" => Ok(Self::Completed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// Input for creating a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub client: String,
    pub cost: f64,
    /// Deadline as `YYYY-MM-DD`.
    pub deadline: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn project_with_task_ids(ids: &[u32]) -> Project {
        Project {
            id: 1,
            name: "Site".to_string(),
            client: "Acme".to_string(),
            cost: 100.0,
            deadline: "2024-01-31".to_string(),
            status: ProjectStatus::Active,
            created_at: Utc::now(),
            tasks: ids
                .iter()
                .map(|&id| Task {
                    id,
                    project_id: 1,
                    title: format!("task {id}"),
                    description: String::new(),
                    deadline: "2024-01-15".to_string(),
                    status: TaskStatus::Waiting,
                    completed_date: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
                .collect(),
            last_task_id: 0,
        }
    }

    #[test]
    fn test_task_ids_start_at_one() {
        assert_eq!(project_with_task_ids(&[]).allocate_task_id().unwrap(), 1);
    }

    #[test]
    fn test_task_ids_use_max_not_last() {
        assert_eq!(project_with_task_ids(&[4, 2]).allocate_task_id().unwrap(), 5);
    }

    #[test]
    fn test_task_ids_respect_high_water_mark() {
        let mut project = project_with_task_ids(&[1]);
        project.last_task_id = 7;

        assert_eq!(project.allocate_task_id().unwrap(), 8);
        assert_eq!(project.allocate_task_id().unwrap(), 9);
        assert_eq!(project.last_task_id, 9);
    }

    #[test]
    fn test_task_id_overflow_is_an_error() {
        let mut project = project_with_task_ids(&[u32::MAX]);

        let err = project.allocate_task_id().unwrap_err();
        assert!(matches!(err, Error::IdExhausted("task")));
        assert_eq!(project.last_task_id, 0);
    }

    #[test]
    fn test_missing_created_at_defaults_on_load() {
        let project: Project = serde_json::from_str(
            r#"{"id":3,"name":"Logo","client":"Globex","cost":250.0,
                "deadline":"2024-02-01","status":"Active","tasks":[]}"#,
        )
        .unwrap();

        assert_eq!(project.id, 3);
        assert_eq!(project.last_task_id, 0);
        assert!(project.created_at <= Utc::now());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!("Completed".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert_eq!("active".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert!(matches!(
            "Archived".parse::<ProjectStatus>(),
            Err(Error::InvalidStatus(label)) if label == "Archived"
        ));
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ProjectStatus::Active.toggled(), ProjectStatus::Completed);
        assert_eq!(ProjectStatus::Completed.toggled(), ProjectStatus::Active);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&ProjectStatus::Completed).unwrap();
        assert_eq!(json, "\"Completed\"");
        assert!(serde_json::from_str::<ProjectStatus>("\"Paused\"").is_err());
    }
}
