//! Prompt types for DigiBuddy.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Fixed persona and safety policy placed at the top of every prompt
    pub persona: String,

    /// Knowledge base block settings
    #[serde(default)]
    pub context: KnowledgeContextConfig,

    /// Template string with Handlebars syntax.
    ///
    /// Available variables: `persona`, `knowledgeContext`, `message`.
    pub template: String,
}

/// Wording of the knowledge base block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeContextConfig {
    #[serde(default = "default_header")]
    pub header: String,

    #[serde(default = "default_footer")]
    pub footer: String,

    /// Citation instructions, numbered in order after the footer
    #[serde(default = "default_instructions")]
    pub instructions: Vec<String>,
}

fn default_header() -> String {
    "=== RELEVANT INFORMATION FROM KNOWLEDGE BASE ===".to_string()
}

fn default_footer() -> String {
    "=== END OF KNOWLEDGE BASE CONTEXT ===".to_string()
}

fn default_instructions() -> Vec<String> {
    vec![
        "Mention that you're referencing information from your knowledge base".to_string(),
        "Cite the source(s) clearly in your response".to_string(),
        "Use phrases like 'According to our mental health resources' or 'Based on our knowledge base'"
            .to_string(),
    ]
}

impl Default for KnowledgeContextConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            footer: default_footer(),
            instructions: default_instructions(),
        }
    }
}

/// One retrieved passage handed to the prompt builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub source: String,
    pub content: String,
}

impl ContextEntry {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Final prompt text sent as a single user turn
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Sources of the context entries, in prompt order
    pub sources: Vec<String>,

    /// Whether a knowledge base block was included
    #[serde(rename = "contextIncluded")]
    pub context_included: bool,
}
