//! Shared fixtures for the integration tests.

use unga_storage::SpeechStore;

pub use unga_storage::testing::WordEmbeddings;

/// In-memory store with the bag-of-words embedder at 384 dimensions.
pub fn semantic_store() -> SpeechStore {
    unga_storage::testing::word_store(384).expect("open in-memory store")
}
