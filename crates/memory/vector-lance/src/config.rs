//! Configuration for LanceVectorStore.
//!
//! Defines LanceConfig and its default values. Used when creating a store
//! via `LanceVectorStore::with_config`.

use crate::DistanceType;

/// Configuration for LanceVectorStore.
#[derive(Debug, Clone)]
pub struct LanceConfig {
    /// Path to the LanceDB database directory.
    pub db_path: String,
    /// Dimension of embedding vectors.
    pub embedding_dim: usize,
    /// Distance metric for vector search.
    pub distance_type: DistanceType,
    /// If true, skip the vector index (exhaustive flat search). Use for
    /// maximum accuracy on small/medium tables.
    pub use_exact_search: bool,
}

impl Default for LanceConfig {
    fn default() -> Self {
        Self {
            db_path: "./data/lancedb".to_string(),
            embedding_dim: 768, // Gemini text-embedding-004
            distance_type: DistanceType::Cosine,
            use_exact_search: true,
        }
    }
}
