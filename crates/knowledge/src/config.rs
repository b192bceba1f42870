//! Knowledge base configuration management.

use crate::embeddings::EmbeddingConfig;
use crate::similarity::SimilarityMetric;
use digibuddy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Knowledge base settings, stored at `.digibuddy/knowledge.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory holding one JSON record per document, relative to the workspace
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Ranking settings for relevance queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Results must score strictly above this
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f32,

    #[serde(default)]
    pub metric: SimilarityMetric,
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("knowledge_base")
}

fn default_top_k() -> usize {
    2
}

fn default_relevance_threshold() -> f32 {
    0.7
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            relevance_threshold: default_relevance_threshold(),
            metric: SimilarityMetric::default(),
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            retrieval: RetrievalConfig::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl KnowledgeConfig {
    /// Resolve the documents directory against the workspace.
    pub fn documents_path(&self, workspace: &Path) -> PathBuf {
        if self.documents_dir.is_absolute() {
            self.documents_dir.clone()
        } else {
            workspace.join(&self.documents_dir)
        }
    }
}

/// Load knowledge base configuration, falling back to defaults when absent.
pub fn load_config(workspace: &Path) -> AppResult<KnowledgeConfig> {
    let config_path = get_config_path(workspace);

    if !config_path.exists() {
        tracing::debug!("No knowledge config at {:?}, using defaults", config_path);
        return Ok(KnowledgeConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        AppError::Knowledge(format!("Failed to read config at {:?}: {}", config_path, e))
    })?;

    let config: KnowledgeConfig = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Knowledge(format!("Failed to parse config at {:?}: {}", config_path, e))
    })?;

    if config.retrieval.top_k == 0 {
        return Err(AppError::Knowledge(
            "retrieval.top_k must be at least 1".to_string(),
        ));
    }

    tracing::debug!("Loaded knowledge config from {:?}", config_path);
    Ok(config)
}

/// Get the path to the knowledge config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".digibuddy").join("knowledge.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_config() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path()).unwrap();

        assert_eq!(config.documents_dir, PathBuf::from("knowledge_base"));
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.retrieval.relevance_threshold, 0.7);
        assert_eq!(config.retrieval.metric, SimilarityMetric::Dot);
        assert_eq!(
            config.documents_path(temp.path()),
            temp.path().join("knowledge_base")
        );
    }

    #[test]
    fn test_load_partial_config() {
        let temp = TempDir::new().unwrap();
        let path = get_config_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "retrieval:\n  top_k: 4\n  metric: cosine\nembedding:\n  provider: trigram\n  model: trigram-v1\n  dimensions: 384\n",
        )
        .unwrap();

        let loaded = load_config(temp.path()).unwrap();
        assert_eq!(loaded.retrieval.top_k, 4);
        assert_eq!(loaded.retrieval.relevance_threshold, 0.7);
        assert_eq!(loaded.retrieval.metric, SimilarityMetric::Cosine);
        assert_eq!(loaded.embedding, EmbeddingConfig::trigram());
        assert_eq!(loaded.documents_dir, PathBuf::from("knowledge_base"));
    }

    #[test]
    fn test_zero_top_k_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = get_config_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "retrieval:\n  top_k: 0\n").unwrap();

        assert!(matches!(load_config(temp.path()), Err(AppError::Knowledge(_))));
    }
}
