//! Knowledge base context block.

use crate::types::{ContextEntry, KnowledgeContextConfig};

/// Render the block of retrieved passages that sits between persona and question.
///
/// Entries are numbered from 1 in the order given. No entries renders nothing.
pub fn render_knowledge_context(config: &KnowledgeContextConfig, entries: &[ContextEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut block = format!("\n\n{}\n", config.header);
    for (i, entry) in entries.iter().enumerate() {
        block.push_str(&format!(
            "\n[Source {}: {}]\n{}\n",
            i + 1,
            entry.source,
            entry.content
        ));
    }
    block.push_str(&format!("\n{}\n", config.footer));

    if !config.instructions.is_empty() {
        block.push_str(
            "\nIMPORTANT: When you use information from the knowledge base above, you MUST:\n",
        );
        for (i, instruction) in config.instructions.iter().enumerate() {
            block.push_str(&format!("{}. {}\n", i + 1, instruction));
        }
    }

    block
}
