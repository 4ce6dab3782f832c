//! Gemini-backed TextGenerator: wraps gemini-client with a model name.

use async_trait::async_trait;
use gemini_client::GeminiClient;

use super::TextGenerator;

/// Default generation model when GEMINI_MODEL is not set.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// TextGenerator over the Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: GeminiClient,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model
        };
        Self {
            client: GeminiClient::new(api_key),
            model,
        }
    }

    /// Overrides the API base URL (e.g. for proxies or test servers).
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model
        };
        Self {
            client: GeminiClient::with_base_url(api_key, base_url),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, anyhow::Error> {
        self.client.generate_content(&self.model, prompt).await
    }
}
