mod file;

pub use file::{DataFile, Dataset};

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::models::*;

/// Owner of the in-memory dataset.
///
/// The dataset is loaded when the database is opened and written back in full after
/// every successful mutation, before the mutating call returns.
pub struct Database {
    file: DataFile,
    data: Dataset,
}

impl Database {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let file = DataFile::new(path);
        let data = file.load_or_init()?;
        Ok(Self { file, data })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The dataset in insertion order, as persisted.
    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    fn save(&self) -> Result<()> {
        self.file.save(&self.data)
    }

    // ============================================================
    // Project operations
    // ============================================================

    pub fn add_project(&mut self, input: CreateProjectInput) -> Result<Project> {
        let id = next_id(
            self.data.last_project_id,
            self.data.projects.iter().map(|p| p.id),
        )
        .ok_or(Error::IdExhausted("project"))?;

        let project = Project {
            id,
            name: input.name,
            client: input.client,
            cost: input.cost,
            deadline: input.deadline,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
            tasks: Vec::new(),
            last_task_id: 0,
        };

        self.data.last_project_id = id;
        self.data.projects.push(project.clone());
        self.save()?;
        tracing::info!("Created project {} ({})", project.id, project.name);
        Ok(project)
    }

    pub fn get_project(&self, id: u32) -> Option<&Project> {
        self.data.projects.iter().find(|p| p.id == id)
    }

    /// All projects, active ones first.
    ///
    /// This is a stable partition: within each status group projects keep their
    /// insertion order.
    pub fn get_projects(&self) -> Vec<&Project> {
        let (active, completed): (Vec<&Project>, Vec<&Project>) = self
            .data
            .projects
            .iter()
            .partition(|p| p.status == ProjectStatus::Active);

        active.into_iter().chain(completed).collect()
    }

    pub fn update_project_status(&mut self, id: u32, status: ProjectStatus) -> Result<Project> {
        let project = self.project_mut(id)?;
        project.status = status;
        let updated = project.clone();

        self.save()?;
        tracing::info!("Project {} is now {}", id, status);
        Ok(updated)
    }

    /// Flip a project between `Active` and `Completed`.
    pub fn toggle_project_status(&mut self, id: u32) -> Result<Project> {
        let current = self
            .get_project(id)
            .ok_or(Error::ProjectNotFound(id))?
            .status;
        self.update_project_status(id, current.toggled())
    }

    /// Delete a project together with all of its tasks.
    pub fn delete_project(&mut self, id: u32) -> Result<()> {
        let index = self
            .data
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::ProjectNotFound(id))?;

        let removed = self.data.projects.remove(index);
        self.save()?;
        tracing::info!(
            "Deleted project {} with {} tasks",
            removed.id,
            removed.tasks.len()
        );
        Ok(())
    }

    // ============================================================
    // Task operations
    // ============================================================

    /// Add a task to a project.
    ///
    /// A missing project is not an error: nothing is created, nothing is saved and
    /// `Ok(None)` is returned.
    pub fn add_task(&mut self, project_id: u32, input: CreateTaskInput) -> Result<Option<Task>> {
        let Some(project) = self.data.projects.iter_mut().find(|p| p.id == project_id) else {
            tracing::debug!("Ignoring task for unknown project {}", project_id);
            return Ok(None);
        };

        let id = project.allocate_task_id()?;
        let now = Utc::now();
        let task = Task {
            id,
            project_id,
            title: input.title,
            description: input.description,
            deadline: input.deadline,
            status: TaskStatus::Waiting,
            completed_date: None,
            created_at: now,
            updated_at: now,
        };
        project.tasks.push(task.clone());

        self.save()?;
        tracing::info!("Created task {} in project {}", task.id, project_id);
        Ok(Some(task))
    }

    /// Every task of every project, in project then task insertion order.
    pub fn get_tasks(&self) -> Vec<&Task> {
        self.data
            .projects
            .iter()
            .flat_map(|p| p.tasks.iter())
            .collect()
    }

    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.get_tasks()
            .into_iter()
            .filter(|t| t.status == status)
            .collect()
    }

    /// Set a task's status.
    ///
    /// Moving to `Done` records `completed_date`, falling back to today's date when
    /// none is supplied. Any other status clears it.
    pub fn update_task_status(
        &mut self,
        project_id: u32,
        task_id: u32,
        status: TaskStatus,
        completed_date: Option<String>,
    ) -> Result<Task> {
        let task = self.task_mut(project_id, task_id)?;
        task.status = status;
        task.updated_at = Utc::now();
        task.completed_date = match status {
            TaskStatus::Done => Some(
                completed_date.unwrap_or_else(|| format_date(Local::now().date_naive())),
            ),
            _ => None,
        };
        let updated = task.clone();

        self.save()?;
        tracing::info!(
            "Task {} in project {} is now {}",
            task_id,
            project_id,
            status
        );
        Ok(updated)
    }

    /// Move a task to the next status in the `Waiting → In Progress → Done` cycle.
    pub fn advance_task_status(
        &mut self,
        project_id: u32,
        task_id: u32,
        today: NaiveDate,
    ) -> Result<Task> {
        let next = self
            .get_project(project_id)
            .ok_or(Error::ProjectNotFound(project_id))?
            .task(task_id)
            .ok_or(Error::TaskNotFound {
                project_id,
                task_id,
            })?
            .status
            .next();

        let completed_date = (next == TaskStatus::Done).then(|| format_date(today));
        self.update_task_status(project_id, task_id, next, completed_date)
    }

    pub fn delete_task(&mut self, project_id: u32, task_id: u32) -> Result<()> {
        let project = self.project_mut(project_id)?;
        let index = project
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(Error::TaskNotFound {
                project_id,
                task_id,
            })?;
        project.tasks.remove(index);

        self.save()?;
        tracing::info!("Deleted task {} from project {}", task_id, project_id);
        Ok(())
    }

    fn project_mut(&mut self, id: u32) -> Result<&mut Project> {
        self.data
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::ProjectNotFound(id))
    }

    fn task_mut(&mut self, project_id: u32, task_id: u32) -> Result<&mut Task> {
        self.project_mut(project_id)?
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(Error::TaskNotFound {
                project_id,
                task_id,
            })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
