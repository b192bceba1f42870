//! Ask command handler.
//!
//! Runs one message through retrieval, prompt assembly and generation.

use super::open_store;
use clap::Args;
use digibuddy_core::{
    config::{AppConfig, ProviderConfig},
    AppError, AppResult,
};
use digibuddy_knowledge::{ResponseGenerator, ResponseResult};
use digibuddy_llm::{create_client, LlmClient, OllamaClient};
use digibuddy_prompt::{load_prompt, DEFAULT_PROMPT_ID};
use std::sync::Arc;
use std::time::Duration;

/// Ask the assistant a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The message to answer
    pub message: String,

    /// Number of knowledge base passages to include
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Prompt definition to use
    #[arg(long, default_value = DEFAULT_PROMPT_ID)]
    pub prompt: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let (knowledge, store) = open_store(config).await?;
        let prompt = load_prompt(&config.workspace, &self.prompt)?;
        tracing::debug!("Loaded prompt definition: {}", prompt.id);

        let client = build_client(config)?;
        let top_k = self.top_k.unwrap_or(knowledge.retrieval.top_k);

        let generator = ResponseGenerator::new(Arc::new(store), client, prompt, config.model.clone())
            .with_top_k(top_k);
        let result = generator.generate_response(&self.message, &[]).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        if !result.is_success() {
            let detail = match result.error {
                Some(error) => format!("{}: {}", result.response, error),
                None => result.response,
            };
            return Err(AppError::Other(detail));
        }

        print!("{}", render_answer(&result));
        Ok(())
    }
}

/// Plain-text rendering of a successful answer followed by its sources.
fn render_answer(result: &ResponseResult) -> String {
    let mut out = format!("{}\n", result.response);
    if let Some(sources) = result.sources.as_ref().filter(|s| !s.is_empty()) {
        out.push_str("\nSources:\n");
        for source in sources {
            out.push_str(&format!("- {}\n", source));
        }
    }
    out
}

/// Build the generation client for the active provider.
fn build_client(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    if let Some(ProviderConfig::Ollama {
        endpoint,
        timeout: Some(secs),
        ..
    }) = config.get_provider_config(&config.provider)
    {
        tracing::debug!("Ollama request timeout: {}s", secs);
        let client = OllamaClient::with_timeout(endpoint.as_str(), Duration::from_secs(*secs))?;
        return Ok(Arc::new(client));
    }

    let endpoint = config.resolve_endpoint(&config.provider);
    let api_key = config.resolve_api_key(&config.provider);

    create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
        .map_err(AppError::Config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_for(provider: &str) -> AppConfig {
        AppConfig {
            workspace: PathBuf::from("."),
            provider: provider.to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_render_answer_lists_sources() {
        let result = ResponseResult::success(
            "Try box breathing.".to_string(),
            vec!["breathing.txt".to_string(), "sleep.txt".to_string()],
        );
        assert_eq!(
            render_answer(&result),
            "Try box breathing.\n\nSources:\n- breathing.txt\n- sleep.txt\n"
        );
    }

    #[test]
    fn test_render_answer_without_sources() {
        let result = ResponseResult::success("Take a short walk.".to_string(), Vec::new());
        assert_eq!(render_answer(&result), "Take a short walk.\n");
    }

    #[test]
    fn test_build_client_for_ollama() {
        let client = build_client(&config_for("ollama")).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_build_client_rejects_unknown_provider() {
        let result = build_client(&config_for("openai"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
