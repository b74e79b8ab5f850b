//! Freelancy: local tracking of freelance projects, their tasks and monthly income.
//!
//! [`db::Database`] owns the dataset and exposes every command that changes it. Each
//! change is written to the data file before the command returns. [`income`] derives
//! reports from the projects without touching them.

pub mod config;
pub mod db;
pub mod error;
pub mod income;
pub mod models;

pub use error::{Error, Result};
