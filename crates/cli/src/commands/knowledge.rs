//! Knowledge command handler.
//!
//! Manages the documents the assistant retrieves context from.

use super::{open_store, snippet};
use clap::{Args, Subcommand};
use digibuddy_core::{config::AppConfig, AppError, AppResult};
use digibuddy_knowledge::ingestion_metadata;
use std::path::{Path, PathBuf};

/// Knowledge base management
#[derive(Args, Debug)]
pub struct KnowledgeCommand {
    #[command(subcommand)]
    pub action: KnowledgeAction,
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeAction {
    /// Add a text file to the knowledge base
    Add(KnowledgeAddCommand),
    /// List stored documents
    List(KnowledgeListCommand),
    /// Rank stored documents against a query
    Search(KnowledgeSearchCommand),
    /// Remove every document with the given source
    Remove(KnowledgeRemoveCommand),
    /// Remove all documents
    Clear(KnowledgeClearCommand),
}

/// Add a document
#[derive(Args, Debug)]
pub struct KnowledgeAddCommand {
    /// File to read
    pub file: PathBuf,

    /// Source name (default: the file name)
    #[arg(long)]
    pub source: Option<String>,
}

impl KnowledgeAddCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge add command for {:?}", self.file);

        let content = std::fs::read_to_string(&self.file)?;
        if content.trim().is_empty() {
            return Err(AppError::Knowledge(format!(
                "Refusing to add empty document: {}",
                self.file.display()
            )));
        }

        let source = match &self.source {
            Some(source) => source.clone(),
            None => default_source(&self.file)?,
        };

        let (_, store) = open_store(config).await?;
        store
            .add_document(content, source.clone(), Some(ingestion_metadata(&self.file)))
            .await?;

        println!("Added '{}' ({} documents in knowledge base)", source, store.len().await);
        Ok(())
    }
}

/// List documents
#[derive(Args, Debug)]
pub struct KnowledgeListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeListCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge list command");

        let (_, store) = open_store(config).await?;
        let documents = store.documents().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&documents)?);
            return Ok(());
        }

        if documents.is_empty() {
            println!("Knowledge base is empty");
            return Ok(());
        }

        for document in &documents {
            let added_at = document
                .metadata
                .get("added_at")
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            println!(
                "{}  ({} chars, added {})",
                document.source,
                document.content.chars().count(),
                added_at
            );
        }
        println!("{} documents", documents.len());

        Ok(())
    }
}

/// Search documents
#[derive(Args, Debug)]
pub struct KnowledgeSearchCommand {
    /// Query text
    pub query: String,

    /// Number of results (default: configured top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeSearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge search command");

        let (knowledge, store) = open_store(config).await?;
        let top_k = self.top_k.unwrap_or(knowledge.retrieval.top_k);
        let results = store.get_relevant_chunks(&self.query, top_k).await;

        tracing::debug!(
            "Search returned {} results (threshold {}, metric {})",
            results.len(),
            knowledge.retrieval.relevance_threshold,
            knowledge.retrieval.metric.as_str()
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        if results.is_empty() {
            println!("No relevant documents found");
            return Ok(());
        }

        for (i, result) in results.iter().enumerate() {
            println!("{}. [{:.3}] {}", i + 1, result.similarity, result.source);
            println!("   {}", snippet(&result.content, 120));
        }

        Ok(())
    }
}

/// Remove a document
#[derive(Args, Debug)]
pub struct KnowledgeRemoveCommand {
    /// Source name to remove
    pub source: String,
}

impl KnowledgeRemoveCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge remove command for '{}'", self.source);

        let (_, store) = open_store(config).await?;
        let removed = store.remove_document(&self.source).await?;

        if removed == 0 {
            return Err(AppError::Knowledge(format!(
                "No document with source '{}'",
                self.source
            )));
        }

        println!("Removed '{}'", self.source);
        Ok(())
    }
}

/// Clear the knowledge base
#[derive(Args, Debug)]
pub struct KnowledgeClearCommand {
    /// Confirm deletion of every document
    #[arg(long)]
    pub yes: bool,
}

impl KnowledgeClearCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge clear command");

        if !self.yes {
            return Err(AppError::Config(
                "Refusing to clear the knowledge base without --yes".to_string(),
            ));
        }

        let (_, store) = open_store(config).await?;
        let removed = store.clear().await?;

        println!("Knowledge base cleared ({} records deleted)", removed);
        Ok(())
    }
}

impl KnowledgeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            KnowledgeAction::Add(cmd) => cmd.execute(config).await,
            KnowledgeAction::List(cmd) => cmd.execute(config).await,
            KnowledgeAction::Search(cmd) => cmd.execute(config).await,
            KnowledgeAction::Remove(cmd) => cmd.execute(config).await,
            KnowledgeAction::Clear(cmd) => cmd.execute(config).await,
        }
    }
}

/// Source name for a file added without `--source`.
fn default_source(path: &Path) -> AppResult<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::Config(format!("Cannot derive a source name from {:?}", path)))
}
