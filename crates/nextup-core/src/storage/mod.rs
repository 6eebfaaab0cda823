//! SQLite persistence and TOML configuration.

mod config;
pub mod migrations;
pub mod task_db;

pub use config::{Config, ServerConfig};
pub use task_db::TaskDb;

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Returns `~/.config/nextup[-dev]/` based on NEXTUP_ENV.
///
/// Set NEXTUP_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NEXTUP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("nextup-dev")
    } else {
        base_dir.join("nextup")
    };

    std::fs::create_dir_all(&dir).map_err(CoreError::Io)?;
    Ok(dir)
}
