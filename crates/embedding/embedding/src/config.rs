//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    /// API key for the Gemini embedding endpoint (GEMINI_API_KEY). Empty means unconfigured.
    fn api_key(&self) -> &str;
    /// Embedding model name (GEMINI_EMBEDDING_MODEL), e.g. "text-embedding-004".
    fn model(&self) -> &str;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub gemini_api_key: String,
    pub embedding_model: String,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn api_key(&self) -> &str {
        &self.gemini_api_key
    }
    fn model(&self) -> &str {
        &self.embedding_model
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables. A missing GEMINI_API_KEY is not an error:
    /// the resulting service reports unconfigured and retrieval degrades.
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        let embedding_model = env::var("GEMINI_EMBEDDING_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "text-embedding-004".to_string());
        Ok(Self {
            gemini_api_key,
            embedding_model,
        })
    }

    /// Validate config. The key may be absent (degraded mode), but when present
    /// it must not be only whitespace.
    pub fn validate(&self) -> Result<()> {
        if !self.gemini_api_key.is_empty() && self.gemini_api_key.trim().is_empty() {
            anyhow::bail!("GEMINI_API_KEY is set but blank");
        }
        Ok(())
    }
}
