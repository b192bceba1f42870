//! Retrieval seam between the response pipeline and the corpus.

use crate::store::DocumentStore;
use crate::types::RetrievalResult;
use async_trait::async_trait;
use digibuddy_core::AppResult;

/// Source of context passages for a user message.
///
/// Failures are reported, not hidden: the [`ResponseGenerator`](super::ResponseGenerator)
/// decides to carry on without context.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, top_k: usize) -> AppResult<Vec<RetrievalResult>>;
}

#[async_trait]
impl ContextRetriever for DocumentStore {
    async fn retrieve(&self, query: &str, top_k: usize) -> AppResult<Vec<RetrievalResult>> {
        Ok(self.get_relevant_chunks(query, top_k).await)
    }
}
