//! StudyHub assistant server entry point.
//!
//! Wires the embedding service, Lance similarity store, retrieval and
//! generation services into the shared application state, seeds the study
//! knowledge base on first run, and serves the chat API.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use gemini_client::mask_token;
use gemini_embedding::GeminiEmbedding;
use generation::ResponseService;
use retrieval::ContextRetrievalService;
use session_history::{InMemorySessionStore, SessionStore};
use vector_lance::{LanceConfig, LanceVectorStore};

use studyhub_server::config::AppConfig;
use studyhub_server::logger;
use studyhub_server::routes;
use studyhub_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    logger::init_tracing(&config.log_file)?;

    info!(
        model = %config.gemini_model,
        embedding_model = %config.embedding_model,
        db_path = %config.lance_db_path,
        api_key = %mask_token(&config.gemini_api_key),
        "Starting StudyHub assistant"
    );

    let embedder = Arc::new(GeminiEmbedding::new(
        config.gemini_api_key.clone(),
        config.embedding_model.clone(),
    ));

    let store = Arc::new(
        LanceVectorStore::with_config(LanceConfig {
            db_path: config.lance_db_path.clone(),
            ..LanceConfig::default()
        })
        .await?,
    );

    let retrieval = Arc::new(ContextRetrievalService::new(store, embedder));
    if retrieval.is_available() {
        match retrieval.seed_study_knowledge().await {
            Ok(stored) if stored > 0 => info!(stored = stored, "Seeded study knowledge base"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Study knowledge seeding failed"),
        }
    } else {
        warn!("Embedding service unconfigured; retrieval will degrade to empty results");
    }

    let generation = Arc::new(ResponseService::from_credentials(
        &config.gemini_api_key,
        &config.gemini_model,
    ));
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let state = AppState::new(generation, retrieval, sessions);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "StudyHub assistant listening");
    axum::serve(listener, app).await?;

    Ok(())
}
