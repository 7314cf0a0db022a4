//! Config save/load roundtrip integration tests.

use std::path::Path;
use tempfile::TempDir;
use unga_core::config::{Config, EmbeddingsProvider, LogLevel};

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unga.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.embeddings.dimension, config.embeddings.dimension);
    assert_eq!(loaded.embeddings.provider, config.embeddings.provider);
    assert_eq!(loaded.search.default_limit, config.search.default_limit);
    assert_eq!(
        loaded.search.systematic_order_above,
        config.search.systematic_order_above
    );
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unga.json5");

    let mut config = Config::default();
    config.storage.db_path = Some(dir.path().join("speeches.db"));
    config.embeddings.provider = EmbeddingsProvider::Hash;
    config.search.similarity_threshold = 0.5;
    config.logging.level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.storage.db_path, Some(dir.path().join("speeches.db")));
    assert_eq!(loaded.embeddings.provider, EmbeddingsProvider::Hash);
    assert_eq!(loaded.search.similarity_threshold, 0.5);
    assert_eq!(loaded.logging.level, LogLevel::Debug);
}

#[test]
fn test_json5_with_comments_and_partial_sections() {
    let config = Config::parse(
        r#"{
            // only override what differs
            embeddings: { provider: "hash" },
            search: { default_limit: 25, },
        }"#,
    )
    .unwrap();
    assert_eq!(config.embeddings.provider, EmbeddingsProvider::Hash);
    assert_eq!(config.embeddings.dimension, 384);
    assert_eq!(config.search.default_limit, 25);
    assert_eq!(config.search.similarity_threshold, 0.7);
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/unga.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
