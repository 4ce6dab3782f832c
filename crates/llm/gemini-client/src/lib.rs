//! # Gemini API client
//!
//! Thin wrapper around the Gemini `generateContent` REST endpoint. The prompt is
//! sent as a single text part (no structured chat turns); conversational context
//! is inlined by the caller. Provides token masking for safe logging and a simple
//! request/response API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
/// Exposed for tests and for callers who need to log API keys safely.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head_len = 7.min(len);
        let tail_len = 4.min(len.saturating_sub(head_len));
        let head = &token[..head_len];
        let tail = if tail_len > 0 {
            &token[len - tail_len..]
        } else {
            ""
        };
        format!("{}***{}", head, tail)
    }
}

/// Gemini generation client. Holds the reqwest client, API key, and base URL.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
    #[serde(rename = "totalTokenCount", default)]
    total_token_count: u32,
}

impl GeminiClient {
    /// Builds a client using the given API key and the default API base URL.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Builds a client with a custom base URL (e.g. for proxies or test servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let mut client = Self::new(api_key);
        client.base_url = base_url;
        client
    }

    /// Sends the full prompt as one text blob to `models/{model}:generateContent`
    /// and returns the first candidate's concatenated part texts.
    ///
    /// Logs masked API key, prompt length, and token usage. Returns an error when
    /// the HTTP call fails or the response carries no candidates.
    pub async fn generate_content(&self, model: &str, prompt: &str) -> anyhow::Result<String> {
        info!(
            model = %model,
            prompt_len = prompt.len(),
            api_key = %mask_token(&self.api_key),
            "Gemini generateContent request"
        );

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini generateContent failed with status {}: {}", status, body);
        }

        let parsed: GenerateResponse = response.json().await?;

        if let Some(ref u) = parsed.usage_metadata {
            info!(
                prompt_tokens = u.prompt_token_count,
                candidate_tokens = u.candidates_token_count,
                total_tokens = u.total_token_count,
                "Gemini generateContent usage"
            );
        }

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            anyhow::bail!("No candidates in Gemini response");
        };

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }
}
