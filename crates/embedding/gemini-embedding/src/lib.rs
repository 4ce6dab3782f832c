//! # Gemini Embedding Service
//!
//! Implementation of the `EmbeddingService` trait using the Gemini embedding API.
//!
//! ## GeminiEmbedding
//!
//! Uses Gemini embedding models (e.g. `text-embedding-004`, 768 dimensions).
//!
//! An empty API key is a valid state: the service reports unconfigured via
//! `is_configured()` and every embed call fails fast without a network request,
//! so callers can degrade to empty retrieval results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gemini_embedding::GeminiEmbedding;
//! use embedding::EmbeddingService;
//!
//! fn create_service() -> GeminiEmbedding {
//!     GeminiEmbedding::new("your-api-key".to_string(), "text-embedding-004".to_string())
//! }
//!
//! async fn example(service: &GeminiEmbedding) -> Result<(), anyhow::Error> {
//!     let embedding = service.embed("Hello world").await?;
//!     println!("Embedding dimension: {}", embedding.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use embedding::EmbeddingService;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const LOG_PREVIEW_LEN: usize = 200;

/// Gemini embedding service implementation.
#[derive(Debug, Clone)]
pub struct GeminiEmbedding {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEmbedding {
    /// Creates a new Gemini embedding service.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key. If empty, will try to read from the
    ///   GEMINI_API_KEY environment variable; still empty means unconfigured.
    /// * `model` - The embedding model to use (e.g. "text-embedding-004").
    pub fn new(api_key: String, model: String) -> Self {
        let api_key = if api_key.is_empty() {
            std::env::var("GEMINI_API_KEY").unwrap_or_default()
        } else {
            api_key
        };

        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Creates a new Gemini embedding service with the default model.
    pub fn with_api_key(api_key: String) -> Self {
        Self::new(api_key, "text-embedding-004".to_string())
    }

    /// Sets a different embedding model.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Overrides the API base URL (e.g. for proxies or test servers).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Returns the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    fn preview(text: &str) -> String {
        if text.len() <= LOG_PREVIEW_LEN {
            text.to_string()
        } else {
            let cut = text
                .char_indices()
                .take_while(|(i, _)| *i < LOG_PREVIEW_LEN)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}...", &text[..cut])
        }
    }
}

#[derive(Debug, Serialize)]
struct ContentPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
}

impl<'a> EmbedRequest<'a> {
    fn new(model: &str, text: &'a str) -> Self {
        Self {
            model: format!("models/{}", model),
            content: Content {
                parts: vec![ContentPart { text }],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingService for GeminiEmbedding {
    /// Generates an embedding vector for a single text string via
    /// `models/{model}:embedContent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, the request fails, or the
    /// response is malformed.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        if !self.is_configured() {
            anyhow::bail!("Gemini embedding service is not configured (no API key)");
        }

        info!(
            model = %self.model,
            text_preview = %Self::preview(text),
            text_len = text.len(),
            "Gemini embedContent request"
        );

        let response = self
            .client
            .post(self.endpoint("embedContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&EmbedRequest::new(&self.model, text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %Self::preview(&body), "Gemini embedContent failed");
            anyhow::bail!("Gemini embedContent failed with status {}: {}", status, body);
        }

        let parsed: EmbedResponse = response.json().await?;
        if parsed.embedding.values.is_empty() {
            anyhow::bail!("Gemini embedContent returned an empty vector");
        }

        info!(
            dimension = parsed.embedding.values.len(),
            "Gemini embedContent done"
        );
        Ok(parsed.embedding.values)
    }

    /// Generates embedding vectors for multiple texts via
    /// `models/{model}:batchEmbedContents`.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if !self.is_configured() {
            anyhow::bail!("Gemini embedding service is not configured (no API key)");
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            model = %self.model,
            batch_size = texts.len(),
            "Gemini batchEmbedContents request"
        );

        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|t| EmbedRequest::new(&self.model, t))
                .collect(),
        };

        let response = self
            .client
            .post(self.endpoint("batchEmbedContents"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %Self::preview(&body), "Gemini batchEmbedContents failed");
            anyhow::bail!(
                "Gemini batchEmbedContents failed with status {}: {}",
                status,
                body
            );
        }

        let parsed: BatchEmbedResponse = response.json().await?;
        if parsed.embeddings.len() != texts.len() {
            anyhow::bail!(
                "Gemini batchEmbedContents returned {} embeddings for {} inputs",
                parsed.embeddings.len(),
                texts.len()
            );
        }

        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
