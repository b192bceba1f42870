//! Embedding configuration types.

use serde::{Deserialize, Serialize};

/// Task type sent to Gemini for both queries and documents.
pub const DEFAULT_TASK_TYPE: &str = "RETRIEVAL_QUERY";

/// Embedding provider settings for the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "gemini", "ollama", "trigram"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier (provider-specific)
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding vector dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Endpoint override for HTTP providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Gemini `taskType`
    #[serde(default = "default_task_type")]
    pub task_type: String,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "embedding-001".to_string()
}

fn default_dimensions() -> usize {
    768
}

fn default_task_type() -> String {
    DEFAULT_TASK_TYPE.to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dimensions: default_dimensions(),
            endpoint: None,
            task_type: default_task_type(),
        }
    }
}

impl EmbeddingConfig {
    /// Offline trigram embeddings, handy for development without credentials.
    pub fn trigram() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "embedding-001");
        assert_eq!(config.task_type, "RETRIEVAL_QUERY");
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: EmbeddingConfig =
            serde_yaml::from_str("provider: ollama\nmodel: nomic-embed-text\n").unwrap();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "nomic-embed-text");
        assert_eq!(config.dimensions, 768);
    }
}
