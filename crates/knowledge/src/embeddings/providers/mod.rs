//! Embedding provider implementations.

pub mod gemini;
pub mod ollama;
pub mod trigram;

pub use gemini::GeminiEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use trigram::TrigramProvider;
