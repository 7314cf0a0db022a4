//! Configuration loading and persistence.

use super::{Config, EmbeddingsProvider};
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.embeddings.dimension == 0 {
            errors.push("Embedding dimension must be greater than 0".to_string());
        }
        if self.embeddings.max_chars == 0 {
            errors.push("Embedding max_chars must be greater than 0".to_string());
        }
        if self.embeddings.provider == EmbeddingsProvider::Openai
            && self.embeddings.api_key.is_none()
            && env::get_var(env::vars::OPENAI_API_KEY).is_none()
        {
            errors.push(
                "Embeddings provider is 'openai' but no api_key or OPENAI_API_KEY is set"
                    .to_string(),
            );
        }

        for (name, value) in [
            ("similarity_threshold", self.search.similarity_threshold),
            ("similar_threshold", self.search.similar_threshold),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                errors.push(format!("Search {} must be within [-1, 1], got {}", name, value));
            }
        }
        if self.search.default_limit == 0 {
            errors.push("Search default_limit must be greater than 0".to_string());
        }
        if self.search.year_range_min == 0 {
            errors.push("Search year_range_min must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Load configuration from the default path, falling back to defaults if no file exists.
    ///
    /// Environment overrides are applied in both cases.
    pub fn load_or_default() -> Self {
        let config = match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    /// Apply `UNGA_DB_PATH`, `UNGA_EMBEDDINGS`, and `OPENAI_API_KEY` on top of this config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env::get_var(env::vars::UNGA_DB_PATH) {
            self.storage.db_path = Some(paths::expand_tilde(&path));
        }

        if let Some(provider) = env::get_var(env::vars::UNGA_EMBEDDINGS) {
            match provider.parse() {
                Ok(p) => self.embeddings.provider = p,
                Err(e) => tracing::warn!(error = %e, "Ignoring UNGA_EMBEDDINGS"),
            }
        }

        if self.embeddings.api_key.is_none() {
            self.embeddings.api_key = env::get_var(env::vars::OPENAI_API_KEY);
        }

        if env::get_bool(env::vars::UNGA_LOG_JSON) {
            self.logging.json = true;
        }

        self
    }

    /// Resolved database path.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => paths::database_file(),
        }
    }
}
