//! Prompt system for DigiBuddy.
//!
//! This crate owns the assistant persona and the shape of the final prompt:
//! - YAML-based prompt definitions with a built-in default
//! - Knowledge base context block rendering
//! - Handlebars template rendering

pub mod builder;
pub mod context;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use context::render_knowledge_context;
pub use loader::{default_prompt, list_prompts, load_prompt, DEFAULT_PROMPT_ID};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, ContextEntry, KnowledgeContextConfig, PromptDefinition,
};
