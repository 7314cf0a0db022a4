//! Speech storage and retrieval for UN General Assembly speeches.
//!
//! This crate provides:
//! - An SQLite-backed store for speeches and AI-generated analyses
//! - Embedding generation (local model, OpenAI-compatible API, or hash fallback)
//! - A `cosine_similarity` SQL function used for ranked retrieval
//! - Filtered, semantic, and nearest-neighbour search
//! - Dataset statistics and cross-year aggregation
//! - File ingestion and legacy database import

pub mod analyses;
pub mod embeddings;
pub mod error;
pub mod ingest;
pub mod legacy;
pub mod models;
pub mod query;
pub mod schema;
pub mod similarity;
pub mod stats;
pub mod store;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use embeddings::{
    select_provider, EmbeddingProvider, FallbackEmbeddings, HashEmbeddings, OpenAIEmbeddings,
};
pub use error::StorageError;
pub use ingest::{
    parse_filename, IngestStats, Ingestor, PassthroughTranslator, Translation, Translator,
};
pub use legacy::LegacyImportStats;
pub use models::{
    AnalysisFilter, AnalysisRecord, CountryEntry, NewAnalysis, NewSpeech, SpeechHit, SpeechRecord,
};
pub use query::SpeechFilter;
pub use similarity::cosine_similarity;
pub use stats::{Statistics, YearTrend};
pub use store::{SpeechStore, StoreOptions};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
