//! Embedding generation for the document store.
//!
//! Provider-agnostic embedding trait, the concrete providers, and the
//! in-memory cache that keeps vectors out of the documents themselves.

pub mod cache;
pub mod config;
pub mod provider;
pub mod providers;

pub use cache::{DocumentKey, EmbeddingCache};
pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
