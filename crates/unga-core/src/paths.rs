//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the base directory (~/.unga, or `$UNGA_HOME`).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(env::vars::UNGA_HOME) {
        return Ok(expand_tilde(&home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".unga"))
}

/// Get the main config file path (~/.unga/unga.json5, or `$UNGA_CONFIG`).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::get_var(env::vars::UNGA_CONFIG) {
        return Ok(expand_tilde(&path));
    }
    Ok(base_dir()?.join("unga.json5"))
}

/// Get the default database path (~/.unga/unga.db).
pub fn database_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("unga.db"))
}

/// Get the local model cache directory (~/.unga/models).
pub fn models_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("models"))
}

/// Ensure all required directories exist.
pub fn ensure_dirs() -> Result<(), ConfigError> {
    for dir in [base_dir()?, models_dir()?] {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
