//! Embedding generation providers.
//!
//! Every provider returns vectors of exactly [`EmbeddingProvider::dimension`]
//! entries. Model-backed providers truncate their input to a bounded number
//! of characters; the hash fallback never fails and never needs a model.

use crate::error::StorageError;
use crate::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use unga_core::config::{EmbeddingsConfig, EmbeddingsProvider};

/// Trait for embedding providers.
pub trait EmbeddingProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Whether similarity between outputs reflects meaning.
    ///
    /// Hash-derived vectors are deterministic but semantically meaningless,
    /// so callers should not rank by them.
    fn is_semantic(&self) -> bool {
        true
    }

    /// Generate embeddings for texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()])?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Embedding("No embedding returned".to_string()))
    }
}

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Every text cut to `max_chars`, in order.
fn truncated_inputs(texts: &[String], max_chars: usize) -> Vec<&str> {
    texts.iter().map(|t| truncate_chars(t, max_chars)).collect()
}

/// Pad with zeros or truncate so the vector has exactly `dimension` entries.
pub fn fit_dimension(mut embedding: Vec<f32>, dimension: usize) -> Vec<f32> {
    embedding.resize(dimension, 0.0);
    embedding
}

/// Deterministic MD5-derived embeddings.
///
/// Each digest byte maps to `b / 255 * 2 - 1`; the remaining entries are zero.
#[derive(Debug, Clone)]
pub struct HashEmbeddings {
    dimension: usize,
}

impl HashEmbeddings {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Infallible single-text embedding.
    pub fn hash_embed(&self, text: &str) -> Vec<f32> {
        let digest = md5::compute(text.as_bytes());
        let values = digest
            .0
            .iter()
            .map(|&b| f32::from(b) / 255.0 * 2.0 - 1.0)
            .collect();
        fit_dimension(values, self.dimension)
    }
}

impl EmbeddingProvider for HashEmbeddings {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn is_semantic(&self) -> bool {
        false
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.hash_embed(t)).collect())
    }
}

/// Body of a `/v1/embeddings` request.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    dimensions: usize,
}

/// OpenAI-compatible embeddings provider.
pub struct OpenAIEmbeddings {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
    max_chars: usize,
}

impl OpenAIEmbeddings {
    /// Create a new OpenAI embeddings provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com".to_string(),
            dimension: unga_core::config::DEFAULT_EMBEDDING_DIMENSION,
            max_chars: unga_core::config::DEFAULT_EMBEDDING_MAX_CHARS,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Request vectors of this width.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Truncate inputs to this many characters.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn request<'a>(&'a self, texts: &'a [String]) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            model: &self.model,
            input: truncated_inputs(texts, self.max_chars),
            dimensions: self.dimension,
        }
    }
}

impl EmbeddingProvider for OpenAIEmbeddings {
    fn name(&self) -> &str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Deserialize)]
        struct Response {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let request = self.request(texts);
        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let text = response.text().unwrap_or_default();
            return Err(StorageError::Embedding(format!("API error: {}", text)));
        }

        let response: Response = response.json()?;
        if response.data.len() != texts.len() {
            return Err(StorageError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }
        Ok(response
            .data
            .into_iter()
            .map(|d| fit_dimension(d.embedding, self.dimension))
            .collect())
    }
}

/// Local sentence-embedding model (all-MiniLM-L6-v2, 384 dimensions).
#[cfg(feature = "local-model")]
pub struct LocalModelEmbeddings {
    model: std::sync::Mutex<fastembed::TextEmbedding>,
    dimension: usize,
    max_chars: usize,
}

#[cfg(feature = "local-model")]
impl LocalModelEmbeddings {
    /// Load the model, downloading it into `cache_dir` on first use.
    pub fn load(cache_dir: std::path::PathBuf, dimension: usize, max_chars: usize) -> Result<Self> {
        use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

        let options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(false);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| StorageError::Embedding(format!("Failed to load model: {}", e)))?;
        Ok(Self {
            model: std::sync::Mutex::new(model),
            dimension,
            max_chars,
        })
    }
}

#[cfg(feature = "local-model")]
impl EmbeddingProvider for LocalModelEmbeddings {
    fn name(&self) -> &str {
        "local"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let inputs = truncated_inputs(texts, self.max_chars);
        let model = self.model.lock().map_err(|_| StorageError::Poisoned)?;
        let embeddings = model
            .embed(inputs, None)
            .map_err(|e| StorageError::Embedding(e.to_string()))?;
        Ok(embeddings
            .into_iter()
            .map(|e| fit_dimension(e, self.dimension))
            .collect())
    }
}

/// Wraps a model-backed provider and substitutes hash embeddings when it fails.
pub struct FallbackEmbeddings {
    primary: Box<dyn EmbeddingProvider>,
    fallback: HashEmbeddings,
}

impl FallbackEmbeddings {
    pub fn new(primary: Box<dyn EmbeddingProvider>) -> Self {
        let fallback = HashEmbeddings::new(primary.dimension());
        Self { primary, fallback }
    }
}

impl EmbeddingProvider for FallbackEmbeddings {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn dimension(&self) -> usize {
        self.primary.dimension()
    }

    fn is_semantic(&self) -> bool {
        self.primary.is_semantic()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self.primary.embed_batch(texts) {
            Ok(embeddings) => Ok(embeddings),
            Err(e) => {
                tracing::error!(
                    provider = self.primary.name(),
                    error = %e,
                    "Failed to generate embedding, using hash fallback"
                );
                self.fallback.embed_batch(texts)
            }
        }
    }
}

/// Build the configured provider, degrading to hash embeddings when it is unavailable.
pub fn select_provider(config: &EmbeddingsConfig) -> Box<dyn EmbeddingProvider> {
    let dimension = config.dimension;
    match config.provider {
        EmbeddingsProvider::Hash => {
            tracing::info!(dimension, "Using hash embeddings");
            Box::new(HashEmbeddings::new(dimension))
        }
        EmbeddingsProvider::Openai => match &config.api_key {
            Some(key) => {
                let mut provider = OpenAIEmbeddings::new(key.clone())
                    .with_dimension(dimension)
                    .with_max_chars(config.max_chars);
                if let Some(model) = &config.model {
                    provider = provider.with_model(model.clone());
                }
                if let Some(url) = &config.base_url {
                    provider = provider.with_base_url(url.clone());
                }
                tracing::info!(dimension, "Embeddings enabled with OpenAI-compatible API");
                Box::new(FallbackEmbeddings::new(Box::new(provider)))
            }
            None => {
                tracing::warn!("No API key for OpenAI embeddings, using hash fallback");
                Box::new(HashEmbeddings::new(dimension))
            }
        },
        EmbeddingsProvider::Local => select_local(config),
    }
}

#[cfg(feature = "local-model")]
fn select_local(config: &EmbeddingsConfig) -> Box<dyn EmbeddingProvider> {
    let cache_dir = match unga_core::paths::models_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(error = %e, "No model cache directory, using hash fallback");
            return Box::new(HashEmbeddings::new(config.dimension));
        }
    };
    match LocalModelEmbeddings::load(cache_dir, config.dimension, config.max_chars) {
        Ok(model) => {
            tracing::info!(dimension = config.dimension, "Embeddings enabled with local model");
            Box::new(FallbackEmbeddings::new(Box::new(model)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load local model, using hash fallback");
            Box::new(HashEmbeddings::new(config.dimension))
        }
    }
}

#[cfg(not(feature = "local-model"))]
fn select_local(config: &EmbeddingsConfig) -> Box<dyn EmbeddingProvider> {
    tracing::warn!("Built without the local-model feature, using hash fallback");
    Box::new(HashEmbeddings::new(config.dimension))
}
