//! LLM provider factory.
//!
//! This module creates generation clients from the provider name, an optional
//! endpoint override and an optional API key.

use crate::client::LlmClient;
use crate::providers::gemini::DEFAULT_GEMINI_URL;
use crate::providers::ollama::DEFAULT_OLLAMA_URL;
use crate::providers::{GeminiClient, OllamaClient};
use crate::types::ProviderType;
use digibuddy_core::logging::mask_secret;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
///
/// # Returns
/// A shared trait object implementing `LlmClient`
///
/// # Errors
/// Returns error if the provider is unknown. A Gemini client without a key
/// is still returned, unconfigured, so the caller can answer requests with a
/// configuration error instead of refusing to start.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Gemini) => {
            match api_key {
                Some(key) => tracing::debug!("Using Gemini API key {}", mask_secret(key)),
                None => tracing::warn!("Gemini API key not set. Generation requests will fail."),
            }
            let base_url = endpoint.unwrap_or(DEFAULT_GEMINI_URL);
            let client = GeminiClient::with_base_url(base_url, api_key.map(str::to_string));
            Ok(Arc::new(client))
        }
        Some(ProviderType::Ollama) => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            let client = OllamaClient::with_base_url(base_url);
            Ok(Arc::new(client))
        }
        None => Err(format!("Unknown provider: {}", provider)),
    }
}
