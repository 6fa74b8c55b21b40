mod config;
pub mod database;
mod plan_repo;
mod pomodoro_repo;

pub use config::{AiConfig, Config, QuizConfig};
pub use database::Database;
pub use plan_repo::{InMemoryStudyPlanRepository, SqliteStudyPlanRepository, StudyPlanRepository};
pub use pomodoro_repo::{
    InMemoryPomodoroRepository, PomodoroRepository, SqlitePomodoroRepository, POMODORO_STATE_KEY,
    STALE_AFTER_MS,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the studyroom data directory, creating it if needed.
///
/// `STUDYROOM_DATA_DIR` wins outright. Otherwise the directory is
/// `~/.config/studyroom/`, or `~/.config/studyroom-dev/` when
/// `STUDYROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STUDYROOM_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyroom-dev")
            } else {
                base_dir.join("studyroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
