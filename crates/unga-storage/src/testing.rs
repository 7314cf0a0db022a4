//! Deterministic embedders for tests.

use crate::embeddings::EmbeddingProvider;
use crate::store::{SpeechStore, StoreOptions};
use crate::Result;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Bag-of-words embedder: each lowercase word increments one hashed bucket.
///
/// Texts sharing words score higher, which is enough to exercise ranking
/// without a model.
pub struct WordEmbeddings {
    pub dimension: usize,
}

impl WordEmbeddings {
    fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            v[(hasher.finish() % self.dimension as u64) as usize] += 1.0;
        }
        v
    }
}

impl EmbeddingProvider for WordEmbeddings {
    fn name(&self) -> &str {
        "words"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.vector(text)).collect())
    }
}

/// In-memory store backed by [`WordEmbeddings`] of the given width.
pub fn word_store(dimension: usize) -> Result<SpeechStore> {
    SpeechStore::open_in_memory(Box::new(WordEmbeddings { dimension }), StoreOptions::default())
}
