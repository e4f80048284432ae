use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

use crate::{
    Command,
    commands::{CommandDescriptor, SlashCommand},
    executor::context::InteractionContext,
    generator::ResponseGenerator,
    models::ModelCatalog,
};

pub const INVALID_MODEL: &str = "Invalid model selected";
pub const PROCESSING_ERROR: &str = "Sorry, there was an error processing your prompt.";

#[derive(Debug, Command)]
#[command(name = "prompt", description = "Send a prompt with an optional model selection")]
pub struct PromptArgs {
    #[option(description = "Prompt text", min_length = 1)]
    pub prompt: String,
    #[option(description = "AI model to use (optional)")]
    pub model: Option<String>,
}

/// `/prompt`: answers a prompt with the selected model.
pub struct PromptCommand {
    catalog: Arc<ModelCatalog>,
    generator: Arc<dyn ResponseGenerator>,
    descriptor: CommandDescriptor,
}

impl PromptCommand {
    /// The model choices are fixed here; changing the catalog afterwards
    /// needs a new deploy.
    pub fn new(catalog: Arc<ModelCatalog>, generator: Arc<dyn ResponseGenerator>) -> Self {
        let descriptor =
            CommandDescriptor::from_args::<PromptArgs>().with_choices("model", catalog.choices());
        Self {
            catalog,
            generator,
            descriptor,
        }
    }

    async fn process_prompt(
        &self,
        ctx: &mut InteractionContext,
        prompt: &str,
        model: &str,
    ) -> Result<()> {
        if let Err(e) = self.answer(ctx, prompt, model).await {
            error!(model, error = ?e, "Error processing prompt");
            ctx.edit_reply(PROCESSING_ERROR).await?;
        }
        Ok(())
    }

    async fn answer(&self, ctx: &mut InteractionContext, prompt: &str, model: &str) -> Result<()> {
        let response = self.generator.generate(prompt, model).await?;
        ctx.edit_reply(&format_answer(model, prompt, &response))
            .await
    }
}

fn format_answer(model: &str, prompt: &str, response: &str) -> String {
    format!("**Model:** {model}\n**Prompt:** {prompt}\n**Response:** {response}")
}

#[async_trait]
impl SlashCommand for PromptCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    async fn execute(&self, ctx: &mut InteractionContext) -> Result<()> {
        ctx.defer_reply().await?;

        let args: PromptArgs = ctx.args()?;
        let model = args
            .model
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.catalog.default_identifier().to_string());

        if !self.catalog.is_valid(&model) {
            ctx.safe_respond(INVALID_MODEL, false).await;
            return Ok(());
        }

        self.process_prompt(ctx, &args.prompt, &model).await
    }
}
