//! Task management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;

use nextup_core::storage::TaskDb;
use nextup_core::task::{EnergyLevel, Task};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Energy required: low, medium, or high (default: medium)
        #[arg(long, default_value = "medium")]
        energy: String,
        /// Estimated duration in minutes (1-480)
        #[arg(long)]
        minutes: u32,
        /// Deadline as an RFC 3339 timestamp, e.g. 2026-09-01T17:00:00Z
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New energy requirement: low, medium, or high
        #[arg(long)]
        energy: Option<String>,
        /// New duration estimate in minutes
        #[arg(long)]
        minutes: Option<u32>,
        /// New deadline as an RFC 3339 timestamp
        #[arg(long)]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long)]
        clear_deadline: bool,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Mark a task as not completed
    Uncomplete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

fn parse_deadline(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let deadline = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("invalid deadline '{raw}': {e}"))?;
    Ok(deadline.with_timezone(&Utc))
}

fn print_task_line(task: &Task) {
    let status = if task.is_completed() { "done" } else { "open" };
    let deadline = task
        .deadline
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  [{status}]  {}  energy={}  minutes={}  deadline={}",
        task.id, task.title, task.energy_required, task.estimated_time_minutes, deadline
    );
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;
    let user = db.ensure_local_user()?;

    match action {
        TaskAction::Add {
            title,
            description,
            energy,
            minutes,
            deadline,
        } => {
            let energy: EnergyLevel = energy.parse()?;
            let mut task = Task::new(&user.id, title, energy, minutes);
            task.description = description;
            if let Some(raw) = deadline {
                task.deadline = Some(parse_deadline(&raw)?);
            }
            task.validate()?;
            db.create_task(&task)?;
            println!("Created task {}", task.id);
        }
        TaskAction::List { all, json } => {
            let tasks = if all {
                db.list_tasks(&user.id)?
            } else {
                db.list_open_tasks(&user.id)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in &tasks {
                    print_task_line(task);
                }
            }
        }
        TaskAction::Update {
            id,
            title,
            description,
            energy,
            minutes,
            deadline,
            clear_deadline,
        } => {
            let Some(mut task) = db.get_task(&user.id, &id)? else {
                return Err(format!("task not found: {id}").into());
            };
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = Some(description);
            }
            if let Some(energy) = energy {
                task.energy_required = energy.parse()?;
            }
            if let Some(minutes) = minutes {
                task.estimated_time_minutes = minutes;
            }
            if let Some(raw) = deadline {
                task.deadline = Some(parse_deadline(&raw)?);
            }
            if clear_deadline {
                task.deadline = None;
            }
            task.validate()?;
            db.update_task(&task)?;
            println!("Updated task {id}");
        }
        TaskAction::Complete { id } => {
            match db.complete_task(&user.id, &id, Utc::now())? {
                Some(_) => println!("Nice work! Task completed."),
                None => return Err(format!("task not found: {id}").into()),
            }
        }
        TaskAction::Uncomplete { id } => match db.uncomplete_task(&user.id, &id)? {
            Some(_) => println!("Task marked as incomplete"),
            None => return Err(format!("task not found: {id}").into()),
        },
        TaskAction::Delete { id } => {
            if db.delete_task(&user.id, &id)? {
                println!("Task deleted");
            } else {
                return Err(format!("task not found: {id}").into());
            }
        }
    }

    Ok(())
}
