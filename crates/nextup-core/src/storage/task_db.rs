//! SQLite-based storage for users and their tasks.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::{data_dir, migrations};
use crate::error::{DatabaseError, Result};
use crate::task::{EnergyLevel, Task};
use crate::user::User;

/// Database file name inside the data directory.
const DB_FILE: &str = "nextup.db";

/// Email of the implicit account used by the single-user CLI.
const LOCAL_USER_EMAIL: &str = "local@nextup";

// === Helper Functions ===

/// Parse energy level from database string
fn parse_energy_level(energy_str: &str) -> EnergyLevel {
    match energy_str {
        "low" => EnergyLevel::Low,
        "high" => EnergyLevel::High,
        _ => EnergyLevel::Medium,
    }
}

/// Format energy level for database storage
fn format_energy_level(energy: EnergyLevel) -> &'static str {
    energy.name()
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an optional RFC3339 column; unparseable text reads as absent.
fn parse_datetime_opt(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

/// Build a Task from a database row (column order matches TASK_COLUMNS).
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let energy_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;

    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        energy_required: parse_energy_level(&energy_str),
        estimated_time_minutes: row.get::<_, i64>(5)? as u32,
        deadline: parse_datetime_opt(row.get(6)?),
        created_at: parse_datetime_fallback(&created_at_str),
        completed_at: parse_datetime_opt(row.get(8)?),
    })
}

/// Build a User from a database row.
fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    let created_at_str: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

const TASK_COLUMNS: &str = "id, user_id, title, description, energy_required, \
                            estimated_minutes, deadline, created_at, completed_at";

/// Handle to the nextup database.
pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open (and migrate) the database in the default data directory.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Self::open_at(&path)
    }

    /// Open (and migrate) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(DatabaseError::from)?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(DatabaseError::from)?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Users ===

    /// Insert a new user. Fails on duplicate email.
    pub fn create_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (id, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up a user by (lowercased) email.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
                params![email.to_lowercase()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by id.
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch or create the implicit account the CLI operates under.
    ///
    /// The local user has no usable password hash, so it can never log in
    /// through the HTTP API.
    pub fn ensure_local_user(&self) -> Result<User> {
        if let Some(user) = self.find_user_by_email(LOCAL_USER_EMAIL)? {
            return Ok(user);
        }
        let user = User::new(LOCAL_USER_EMAIL, "");
        self.create_user(&user)?;
        Ok(user)
    }

    // === Tasks ===

    /// Insert a new task.
    pub fn create_task(&self, task: &Task) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                task.id,
                task.user_id,
                task.title,
                task.description,
                format_energy_level(task.energy_required),
                task.estimated_time_minutes as i64,
                task.deadline.map(|d| d.to_rfc3339()),
                task.created_at.to_rfc3339(),
                task.completed_at.map(|d| d.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Fetch one task, scoped to its owner.
    pub fn get_task(&self, user_id: &str, id: &str) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
                params![id, user_id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// List all of a user's tasks, newest first.
    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY created_at DESC"
        ))?;
        let tasks = stmt
            .query_map(params![user_id], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// List a user's not-yet-completed tasks, newest first.
    ///
    /// This is the snapshot handed to the recommendation engine.
    pub fn list_open_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE user_id = ?1 AND completed_at IS NULL
             ORDER BY created_at DESC"
        ))?;
        let tasks = stmt
            .query_map(params![user_id], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Update a task's editable fields. Returns false when no task matched.
    pub fn update_task(&self, task: &Task) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE tasks SET
                title = ?3,
                description = ?4,
                energy_required = ?5,
                estimated_minutes = ?6,
                deadline = ?7
             WHERE id = ?1 AND user_id = ?2",
            params![
                task.id,
                task.user_id,
                task.title,
                task.description,
                format_energy_level(task.energy_required),
                task.estimated_time_minutes as i64,
                task.deadline.map(|d| d.to_rfc3339()),
            ],
        )?;
        Ok(rows > 0)
    }

    /// Stamp a task completed. Returns the updated task, or None if missing.
    pub fn complete_task(
        &self,
        user_id: &str,
        id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Task>> {
        self.conn.execute(
            "UPDATE tasks SET completed_at = ?3 WHERE id = ?1 AND user_id = ?2",
            params![id, user_id, completed_at.to_rfc3339()],
        )?;
        self.get_task(user_id, id)
    }

    /// Clear a task's completion stamp. Returns the updated task, or None.
    pub fn uncomplete_task(&self, user_id: &str, id: &str) -> Result<Option<Task>> {
        self.conn.execute(
            "UPDATE tasks SET completed_at = NULL WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        self.get_task(user_id, id)
    }

    /// Delete a task, scoped to its owner. Returns false when no task matched.
    pub fn delete_task(&self, user_id: &str, id: &str) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}
