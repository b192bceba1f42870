//! Command handlers for the DigiBuddy CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod knowledge;
pub mod prompts;

pub use ask::AskCommand;
pub use knowledge::KnowledgeCommand;
pub use prompts::PromptsCommand;

use digibuddy_core::{config::AppConfig, AppResult};
use digibuddy_knowledge::{
    config::load_config, embeddings::create_provider, DocumentStore, FsDocumentPersistence,
    KnowledgeConfig,
};
use std::sync::Arc;

/// Open the workspace knowledge base with its configured embedding provider.
///
/// The Gemini key doubles as the embedding credential regardless of which
/// provider generates answers.
pub(crate) async fn open_store(config: &AppConfig) -> AppResult<(KnowledgeConfig, DocumentStore)> {
    let knowledge = load_config(&config.workspace)?;
    let documents_dir = knowledge.documents_path(&config.workspace);
    tracing::debug!("Knowledge base directory: {:?}", documents_dir);

    let persistence = Arc::new(FsDocumentPersistence::new(documents_dir));
    let api_key = config.resolve_api_key("gemini");
    let provider = create_provider(&knowledge.embedding, api_key.as_deref())?;

    let store = DocumentStore::open(persistence, provider, &knowledge.retrieval).await?;
    let embeddings = store.embedding_provider();
    tracing::debug!(
        provider = embeddings.provider_name(),
        model = embeddings.model_name(),
        "Opened knowledge base"
    );
    Ok((knowledge, store))
}

/// Shorten text for one-line listings.
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
