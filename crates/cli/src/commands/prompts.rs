//! Prompts command handler.

use clap::Args;
use digibuddy_core::{config::AppConfig, AppResult};
use digibuddy_prompt::{list_prompts, DEFAULT_PROMPT_ID};

/// List prompt definitions usable with `ask --prompt`
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing prompts command");

        let ids = list_prompts(&config.workspace)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&ids)?);
            return Ok(());
        }

        for id in &ids {
            if id == DEFAULT_PROMPT_ID {
                println!("{} (default)", id);
            } else {
                println!("{}", id);
            }
        }

        Ok(())
    }
}
