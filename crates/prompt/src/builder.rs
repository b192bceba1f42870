//! Prompt builder for rendering templates and injecting context.

use crate::context::render_knowledge_context;
use crate::types::{BuiltPrompt, BuiltPromptMetadata, ContextEntry, PromptDefinition};
use digibuddy_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build the final prompt text for one user message.
///
/// The persona, the knowledge context block (empty when `context` is empty)
/// and the message are handed to the definition's Handlebars template.
///
/// # Example
/// ```no_run
/// use digibuddy_prompt::{build_prompt, default_prompt, ContextEntry};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = default_prompt()?;
/// let context = vec![ContextEntry::new("sleep.txt", "Keep a regular bedtime.")];
/// let built = build_prompt(&def, "I can't sleep", &context)?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    message: &str,
    context: &[ContextEntry],
) -> AppResult<BuiltPrompt> {
    tracing::debug!(
        prompt_id = %definition.id,
        context_entries = context.len(),
        "Building prompt"
    );

    let mut variables = HashMap::new();
    variables.insert("persona".to_string(), definition.persona.clone());
    variables.insert(
        "knowledgeContext".to_string(),
        render_knowledge_context(&definition.context, context),
    );
    variables.insert("message".to_string(), message.to_string());

    let text = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            sources: context.iter().map(|entry| entry.source.clone()).collect(),
            context_included: !context.is_empty(),
        },
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
