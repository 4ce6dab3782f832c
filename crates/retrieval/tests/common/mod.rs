//! Shared test utilities for retrieval integration tests.
//!
//! Provides a fixed-vector MockEmbeddingService used together with the real
//! in-memory vector store, so distances are fully controlled by the test.

use async_trait::async_trait;
use embedding::EmbeddingService;

/// Embedding service returning one fixed vector for every input.
///
/// With the in-memory store's cosine distance, records inserted with chosen
/// embeddings land at chosen distances from this query vector.
pub struct MockEmbeddingService {
    pub vector: Vec<f32>,
    pub configured: bool,
}

impl MockEmbeddingService {
    pub fn fixed(vector: Vec<f32>) -> Self {
        Self {
            vector,
            configured: true,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            vector: Vec::new(),
            configured: false,
        }
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        if !self.configured {
            anyhow::bail!("mock embedding service is unconfigured");
        }
        Ok(self.vector.clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if !self.configured {
            anyhow::bail!("mock embedding service is unconfigured");
        }
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
