//! Domain models for Freelancy.
//!
//! # Core Concepts
//!
//! - [`Project`]: A billable engagement with a client. Projects own an ordered list of tasks
//!   and are the only unit that contributes to income reports.
//! - [`Task`]: A unit of work inside exactly one project. Task ids are unique only within
//!   their project, so a task is addressed by `(project_id, task_id)`.
//!
//! Status fields are closed enums. Unknown labels are rejected when parsing or
//! deserializing, never carried through as free text.

mod project;
mod task;

pub use project::*;
pub use task::*;
