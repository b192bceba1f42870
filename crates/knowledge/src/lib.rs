//! Knowledge base and retrieval-augmented responses for DigiBuddy.
//!
//! A small corpus of documents is kept in memory, persisted one JSON record
//! per document, and ranked by brute-force embedding similarity. The
//! [`ResponseGenerator`] wraps a generation provider with that retrieval and
//! guarantees source attribution on grounded answers.
//!
//! # Example
//! ```no_run
//! use digibuddy_knowledge::{
//!     embeddings::{create_provider, EmbeddingConfig},
//!     DocumentStore, FsDocumentPersistence, RetrievalConfig, ResponseGenerator,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let persistence = Arc::new(FsDocumentPersistence::new("knowledge_base"));
//! let provider = create_provider(&EmbeddingConfig::trigram(), None)?;
//! let store = Arc::new(DocumentStore::open(persistence, provider, &RetrievalConfig::default()).await?);
//!
//! let client = digibuddy_llm::create_client("ollama", None, None)?;
//! let prompt = digibuddy_prompt::default_prompt()?;
//! let generator = ResponseGenerator::new(store, client, prompt, "llama3.2");
//!
//! let result = generator.generate_response("I can't sleep before exams", &[]).await;
//! println!("{}", result.response);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod embeddings;
pub mod persistence;
pub mod rag;
pub mod similarity;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::{KnowledgeConfig, RetrievalConfig};
pub use persistence::{storage_stem, DocumentPersistence, FsDocumentPersistence};
pub use rag::{ContextRetriever, ResponseGenerator};
pub use similarity::SimilarityMetric;
pub use store::DocumentStore;
pub use types::{
    ingestion_metadata, ChatRole, ChatTurn, Document, Metadata, ResponseResult, ResponseStatus,
    RetrievalResult,
};
