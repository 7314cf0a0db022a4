//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Common environment variable names.
pub mod vars {
    /// API key for OpenAI-compatible embedding endpoints.
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

    /// Home directory override (defaults to ~/.unga).
    pub const UNGA_HOME: &str = "UNGA_HOME";

    /// Config file override.
    pub const UNGA_CONFIG: &str = "UNGA_CONFIG";

    /// Database file override.
    pub const UNGA_DB_PATH: &str = "UNGA_DB_PATH";

    /// Embedding provider override (`local`, `openai`, `hash`).
    pub const UNGA_EMBEDDINGS: &str = "UNGA_EMBEDDINGS";

    /// Emit JSON log lines.
    pub const UNGA_LOG_JSON: &str = "UNGA_LOG_JSON";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_bool() {
        env::set_var("UNGA_TEST_BOOL_TRUE", "true");
        env::set_var("UNGA_TEST_BOOL_1", "1");
        env::set_var("UNGA_TEST_BOOL_FALSE", "false");
        env::set_var("UNGA_TEST_BOOL_0", "0");

        assert!(get_bool("UNGA_TEST_BOOL_TRUE"));
        assert!(get_bool("UNGA_TEST_BOOL_1"));
        assert!(!get_bool("UNGA_TEST_BOOL_FALSE"));
        assert!(!get_bool("UNGA_TEST_BOOL_0"));
        assert!(!get_bool("UNGA_TEST_BOOL_NONEXISTENT"));
    }

    #[test]
    fn test_empty_var_is_unset() {
        env::set_var("UNGA_TEST_EMPTY", "");
        assert!(get_var("UNGA_TEST_EMPTY").is_none());
        assert!(!get_bool("UNGA_TEST_EMPTY"));
    }
}
