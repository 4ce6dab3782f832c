//! Shared fixtures for router tests: mock generator and embedding service
//! wired into real in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;

use embedding::EmbeddingService;
use generation::{ResponseService, TextGenerator};
use retrieval::ContextRetrievalService;
use session_history::InMemorySessionStore;
use studyhub_server::state::AppState;
use vector_inmemory::InMemoryVectorStore;

/// Generator answering every prompt with the same canned text.
pub struct CannedGenerator(pub String);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, anyhow::Error> {
        Ok(self.0.clone())
    }
}

/// Embedding service returning one fixed vector for every input.
pub struct FixedEmbedding(pub Vec<f32>);

#[async_trait]
impl EmbeddingService for FixedEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(self.0.clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|_| self.0.clone()).collect())
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// State with a canned generator, fixed embeddings, and in-memory stores.
/// Returns the retrieval handle too so tests can pre-load knowledge.
pub fn test_state(reply: &str) -> (AppState, Arc<ContextRetrievalService>) {
    let retrieval = Arc::new(ContextRetrievalService::new(
        Arc::new(InMemoryVectorStore::new()),
        Arc::new(FixedEmbedding(vec![1.0, 0.0])),
    ));
    let state = AppState::new(
        Arc::new(ResponseService::new(Arc::new(CannedGenerator(
            reply.to_string(),
        )))),
        retrieval.clone(),
        Arc::new(InMemorySessionStore::new()),
    );
    (state, retrieval)
}

/// State whose generation service holds no credential.
pub fn unconfigured_state() -> AppState {
    let retrieval = Arc::new(ContextRetrievalService::new(
        Arc::new(InMemoryVectorStore::new()),
        Arc::new(FixedEmbedding(vec![1.0, 0.0])),
    ));
    AppState::new(
        Arc::new(ResponseService::unconfigured()),
        retrieval,
        Arc::new(InMemorySessionStore::new()),
    )
}
