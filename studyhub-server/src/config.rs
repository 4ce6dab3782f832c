//! Server configuration loaded from environment variables.
//!
//! Load `.env` (dotenvy) before calling `from_env`, or the variables set there
//! will not be seen.

use anyhow::Result;
use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key, shared by generation and embedding. Empty means both
    /// services run degraded.
    pub gemini_api_key: String,
    /// Generation model name (GEMINI_MODEL).
    pub gemini_model: String,
    /// Embedding model name (GEMINI_EMBEDDING_MODEL).
    pub embedding_model: String,
    /// Directory of the Lance similarity store (LANCE_DB_PATH).
    pub lance_db_path: String,
    /// Listen address (STUDYHUB_ADDR).
    pub bind_addr: String,
    /// Log file path (STUDYHUB_LOG_FILE).
    pub log_file: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    /// Load from environment variables, with defaults for everything except
    /// the API key (whose absence is a valid degraded state).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env_or("GEMINI_MODEL", "gemini-pro"),
            embedding_model: env_or("GEMINI_EMBEDDING_MODEL", "text-embedding-004"),
            lance_db_path: env_or("LANCE_DB_PATH", "./data/lancedb"),
            bind_addr: env_or("STUDYHUB_ADDR", "0.0.0.0:5000"),
            log_file: env_or("STUDYHUB_LOG_FILE", "studyhub.log"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_blank() {
        std::env::set_var("STUDYHUB_TEST_BLANK", "   ");
        assert_eq!(env_or("STUDYHUB_TEST_BLANK", "fallback"), "fallback");
        std::env::remove_var("STUDYHUB_TEST_BLANK");
        assert_eq!(env_or("STUDYHUB_TEST_MISSING", "fallback"), "fallback");
    }
}
