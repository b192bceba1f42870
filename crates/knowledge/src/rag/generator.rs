//! Retrieval-augmented response generation.

use crate::rag::citations::attach_citations;
use crate::rag::retriever::ContextRetriever;
use crate::types::{ChatTurn, ResponseResult};
use digibuddy_llm::{LlmClient, LlmRequest};
use digibuddy_prompt::{build_prompt, ContextEntry, PromptDefinition};
use std::sync::Arc;

/// Returned when the generation provider has no credential.
pub const NO_CREDENTIAL_MESSAGE: &str = "API key not set on server. Please contact admin.";

/// Returned when the provider answers with no text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "No response generated from the language model.";

/// Returned when the provider call (or prompt assembly) fails.
pub const PROVIDER_ERROR_MESSAGE: &str = "Error contacting the language model.";

/// Default number of passages retrieved per message.
pub const DEFAULT_TOP_K: usize = 2;

/// Answers user messages, grounding them in retrieved context when available.
pub struct ResponseGenerator {
    retriever: Arc<dyn ContextRetriever>,
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    model: String,
    top_k: usize,
}

impl ResponseGenerator {
    pub fn new(
        retriever: Arc<dyn ContextRetriever>,
        client: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        model: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            client,
            prompt,
            model: model.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Produce a [`ResponseResult`] for one message. Never fails.
    ///
    /// Prior turns are accepted but not sent to the model.
    pub async fn generate_response(&self, message: &str, chat_history: &[ChatTurn]) -> ResponseResult {
        if !self.client.is_configured() {
            tracing::error!(
                provider = self.client.provider_name(),
                "Generation provider has no credential, refusing request"
            );
            return ResponseResult::error(NO_CREDENTIAL_MESSAGE, None);
        }

        tracing::debug!(history_turns = chat_history.len(), "Generating response");

        let retrieved = match self.retriever.retrieve(message, self.top_k).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Failed to retrieve documents, continuing without context: {}", e);
                Vec::new()
            }
        };

        let context: Vec<ContextEntry> = retrieved
            .into_iter()
            .map(|result| ContextEntry::new(result.source, result.content))
            .collect();

        let built = match build_prompt(&self.prompt, message, &context) {
            Ok(built) => built,
            Err(e) => {
                tracing::error!("Failed to build prompt: {}", e);
                return ResponseResult::error(PROVIDER_ERROR_MESSAGE, Some(e.to_string()));
            }
        };
        let sources = built.metadata.sources;

        tracing::info!(
            provider = self.client.provider_name(),
            context_entries = sources.len(),
            "Sending message: {}",
            preview(message, 100)
        );

        let request = LlmRequest::new(built.text, self.model.as_str());
        match self.client.complete(&request).await {
            Ok(response) if response.content.trim().is_empty() => {
                tracing::error!("Received empty response from the language model");
                ResponseResult::error(EMPTY_RESPONSE_MESSAGE, None)
            }
            Ok(response) => {
                tracing::info!("Received response from the language model");
                let text = attach_citations(response.content, &sources);
                ResponseResult::success(text, sources)
            }
            Err(e) => {
                tracing::error!("Language model error: {}", e);
                ResponseResult::error(PROVIDER_ERROR_MESSAGE, Some(e.to_string()))
            }
        }
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
