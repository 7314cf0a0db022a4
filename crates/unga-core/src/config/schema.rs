//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Embedding vector width shared by every stored speech.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

/// Characters fed to a model-backed embedder before truncation.
pub const DEFAULT_EMBEDDING_MAX_CHARS: usize = 5000;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding settings.
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Search defaults.
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file path. Defaults to ~/.unga/unga.db.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

/// Embeddings provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingsProvider {
    /// Local sentence-embedding model (requires the `local-model` feature).
    #[default]
    Local,
    /// OpenAI-compatible `/v1/embeddings` endpoint.
    Openai,
    /// Deterministic MD5-derived vectors; no semantic meaning.
    Hash,
}

impl std::str::FromStr for EmbeddingsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "openai" => Ok(Self::Openai),
            "hash" => Ok(Self::Hash),
            other => Err(format!("unknown embeddings provider '{}'", other)),
        }
    }
}

/// Embeddings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Which provider to try first.
    #[serde(default)]
    pub provider: EmbeddingsProvider,

    /// Model name for the selected provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Vector width.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Input truncation bound for model-backed providers.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Base URL for the OpenAI-compatible provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key for the OpenAI-compatible provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_dimension() -> usize {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_max_chars() -> usize {
    DEFAULT_EMBEDDING_MAX_CHARS
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingsProvider::default(),
            model: None,
            dimension: default_dimension(),
            max_chars: default_max_chars(),
            base_url: None,
            api_key: None,
        }
    }
}

/// Search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default result limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Minimum similarity for semantic search.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Minimum similarity for "more like this" lookups.
    #[serde(default = "default_similar_threshold")]
    pub similar_threshold: f32,

    /// Above this limit, results are ordered by year/name instead of randomly.
    #[serde(default = "default_systematic_order_above")]
    pub systematic_order_above: usize,

    /// Contiguous year lists longer than this become a BETWEEN clause.
    #[serde(default = "default_year_range_min")]
    pub year_range_min: usize,
}

fn default_limit() -> usize {
    10
}

fn default_similarity_threshold() -> f32 {
    0.7
}

fn default_similar_threshold() -> f32 {
    0.8
}

fn default_systematic_order_above() -> usize {
    1000
}

fn default_year_range_min() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            similarity_threshold: default_similarity_threshold(),
            similar_threshold: default_similar_threshold(),
            systematic_order_above: default_systematic_order_above(),
            year_range_min: default_year_range_min(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
