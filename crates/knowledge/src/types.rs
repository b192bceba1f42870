//! Knowledge system type definitions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Free-form document metadata.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A document in the corpus.
///
/// This is also the persisted record: embeddings live in the
/// [`EmbeddingCache`](crate::embeddings::EmbeddingCache), never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full text used for embedding and as prompt context
    pub content: String,

    /// Identifier shown in citations, also the basis of the storage key
    pub source: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            metadata,
        }
    }
}

/// Metadata recorded when a document is ingested from a file.
pub fn ingestion_metadata(path: &Path) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(
        "original_path".to_string(),
        serde_json::Value::String(path.display().to_string()),
    );
    metadata.insert(
        "added_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );
    metadata
}

/// A scored document returned from a relevance query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub content: String,
    pub source: String,
    pub metadata: Metadata,
    pub similarity: f32,
}

impl RetrievalResult {
    pub(crate) fn from_document(document: &Document, similarity: f32) -> Self {
        Self {
            content: document.content.clone(),
            source: document.source.clone(),
            metadata: document.metadata.clone(),
            similarity,
        }
    }
}

/// Outcome of a generated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Structured answer handed back to the chat surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseResult {
    /// Answer text, or a human-readable message on error
    pub response: String,

    pub status: ResponseStatus,

    /// Sources used as context, in retrieval order; `None` when nothing was retrieved
    pub sources: Option<Vec<String>>,

    /// True whenever context was retrieved, whether or not the model used it
    pub used_knowledge_base: bool,

    /// Diagnostic text from a failed provider call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseResult {
    pub fn success(response: String, sources: Vec<String>) -> Self {
        let used_knowledge_base = !sources.is_empty();
        Self {
            response,
            status: ResponseStatus::Success,
            sources: if used_knowledge_base { Some(sources) } else { None },
            used_knowledge_base,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            response: message.into(),
            status: ResponseStatus::Error,
            sources: None,
            used_knowledge_base: false,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Who spoke in a prior chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior exchange in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_roundtrips_without_embedding_field() {
        let doc = Document::new("Breathe in for four counts.", "breathing.txt", Metadata::new());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["source"], "breathing.txt");
        assert!(json.get("embedding").is_none());

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_document_accepts_missing_metadata() {
        let doc: Document = serde_json::from_str(r#"{"content": "c", "source": "s"}"#).unwrap();
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_success_without_sources_serializes_null() {
        let result = ResponseResult::success("Hello".to_string(), Vec::new());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "success");
        assert!(json["sources"].is_null());
        assert_eq!(json["used_knowledge_base"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_result_shape() {
        let result = ResponseResult::error("Error contacting the language model.", Some("timeout".to_string()));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "timeout");
        assert!(!result.is_success());
    }

    #[test]
    fn test_ingestion_metadata_fields() {
        let metadata = ingestion_metadata(Path::new("docs/sleep.txt"));
        assert_eq!(metadata["original_path"], "docs/sleep.txt");
        let added_at = metadata["added_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(added_at).is_ok());
    }
}
