use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freelancy::config;
use freelancy::db::Database;
use freelancy::income::{self, IncomeReport};
use freelancy::models::*;

#[derive(Parser)]
#[command(name = "freelancy")]
#[command(about = "Track freelance projects, tasks and monthly income")]
struct Cli {
    /// Data file to use instead of ~/.freelancy/data.json
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Print results as pretty JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Show income for the last twelve months
    Income,
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        client: String,
        #[arg(long)]
        cost: f64,
        /// Deadline as YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        deadline: String,
    },
    /// List projects, active first
    List,
    /// Set a project's status (Active or Completed)
    Status { id: u32, status: ProjectStatus },
    /// Switch a project between Active and Completed
    Toggle { id: u32 },
    /// Delete a project and all of its tasks
    Delete { id: u32 },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Create a task in a project
    Add {
        project_id: u32,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Deadline as YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        deadline: String,
    },
    /// List tasks across all projects
    List {
        /// Only show tasks with this status
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Set a task's status (Waiting, "In Progress" or Done)
    Status {
        project_id: u32,
        task_id: u32,
        status: TaskStatus,
        /// Completion date for Done, as YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_date)]
        completed_date: Option<String>,
    },
    /// Move a task to its next status
    Advance { project_id: u32, task_id: u32 },
    /// Delete a task
    Delete { project_id: u32, task_id: u32 },
}

fn parse_date(s: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

/// Initialize tracing on stderr so stdout only carries command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "freelancy=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let path = config::resolve_data_file(cli.data_file)?;
    let mut db = Database::open(&path)
        .with_context(|| format!("Failed to open data file {}", path.display()))?;
    let json = cli.json;

    match cli.command {
        Commands::Project(command) => run_project(&mut db, command, json)?,
        Commands::Task(command) => run_task(&mut db, command, json)?,
        Commands::Income => {
            let report = income::monthly_income_now(db.get_projects());
            if json {
                print_json(&report)?;
            } else {
                print_income(&report);
            }
        }
    }

    Ok(())
}

fn run_project(db: &mut Database, command: ProjectCommand, json: bool) -> anyhow::Result<()> {
    match command {
        ProjectCommand::Add {
            name,
            client,
            cost,
            deadline,
        } => {
            let project = db.add_project(CreateProjectInput {
                name,
                client,
                cost,
                deadline,
            })?;
            show_project(&project, json)?;
        }
        ProjectCommand::List => {
            let projects = db.get_projects();
            if json {
                print_json(&projects)?;
            } else if projects.is_empty() {
                println!("No projects yet.");
            } else {
                for project in projects {
                    println!("{}", project_line(project));
                }
            }
        }
        ProjectCommand::Status { id, status } => {
            let project = db.update_project_status(id, status)?;
            show_project(&project, json)?;
        }
        ProjectCommand::Toggle { id } => {
            let project = db.toggle_project_status(id)?;
            show_project(&project, json)?;
        }
        ProjectCommand::Delete { id } => {
            db.delete_project(id)?;
            if !json {
                println!("Deleted project #{}", id);
            }
        }
    }
    Ok(())
}

fn run_task(db: &mut Database, command: TaskCommand, json: bool) -> anyhow::Result<()> {
    match command {
        TaskCommand::Add {
            project_id,
            title,
            description,
            deadline,
        } => {
            let task = db.add_task(
                project_id,
                CreateTaskInput {
                    title,
                    description,
                    deadline,
                },
            )?;
            match task {
                Some(task) => show_task(&task, json)?,
                None if json => print_json(&Option::<Task>::None)?,
                None => println!("No project #{}; nothing added.", project_id),
            }
        }
        TaskCommand::List { status } => {
            let tasks = match status {
                Some(status) => db.tasks_with_status(status),
                None => db.get_tasks(),
            };
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in tasks {
                    println!("{}", task_line(task));
                }
            }
        }
        TaskCommand::Status {
            project_id,
            task_id,
            status,
            completed_date,
        } => {
            let task = db.update_task_status(project_id, task_id, status, completed_date)?;
            show_task(&task, json)?;
        }
        TaskCommand::Advance {
            project_id,
            task_id,
        } => {
            let today = Local::now().date_naive();
            let task = db.advance_task_status(project_id, task_id, today)?;
            show_task(&task, json)?;
        }
        TaskCommand::Delete {
            project_id,
            task_id,
        } => {
            db.delete_task(project_id, task_id)?;
            if !json {
                println!("Deleted task #{} from project #{}", task_id, project_id);
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show_project(project: &Project, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(project)
    } else {
        println!("{}", project_line(project));
        Ok(())
    }
}

fn show_task(task: &Task, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(task)
    } else {
        println!("{}", task_line(task));
        Ok(())
    }
}

fn project_line(project: &Project) -> String {
    format!(
        "#{} {} [{}] client: {}, cost: ${:.2}, deadline: {}, tasks: {}",
        project.id,
        project.name,
        project.status,
        project.client,
        project.cost,
        project.deadline,
        project.tasks.len()
    )
}

fn task_line(task: &Task) -> String {
    let mut line = format!(
        "#{}/{} {} [{}] deadline: {}",
        task.project_id, task.id, task.title, task.status, task.deadline
    );
    if let Some(date) = &task.completed_date {
        line.push_str(&format!(", completed: {}", date));
    }
    line
}

fn print_income(report: &IncomeReport) {
    for month in &report.months {
        println!("{:<9} ${:>10.2}", month.label, month.income);
        for project in &month.projects {
            println!("            {}", project);
        }
    }
    println!();
    println!("Total:     ${:>10.2}", report.total);
    println!("Average:   ${:>10.2}", report.average);
}
