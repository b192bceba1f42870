//! Retrieval-augmented response pipeline.

pub mod citations;
pub mod generator;
pub mod retriever;

pub use citations::attach_citations;
pub use generator::{
    ResponseGenerator, DEFAULT_TOP_K, EMPTY_RESPONSE_MESSAGE, NO_CREDENTIAL_MESSAGE,
    PROVIDER_ERROR_MESSAGE,
};
pub use retriever::ContextRetriever;
