use std::sync::Arc;

use tracing::{debug, error, warn};
use twilight_model::application::interaction::Interaction;

use super::context::{InteractionContext, Responder};
use crate::registry::CommandRegistry;

/// Sent to the user when a command fails. Never includes error details.
pub const GENERIC_ERROR: &str = "There was an error while executing this command!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Executed,
    /// The handler returned an error and the user was told.
    Failed,
    /// No handler is registered under the command name.
    UnknownCommand,
}

/// Routes chat input interactions to the command registered under their name.
pub struct SlashDispatcher {
    registry: Arc<CommandRegistry>,
    responder: Arc<dyn Responder>,
}

impl SlashDispatcher {
    pub fn new(registry: Arc<CommandRegistry>, responder: Arc<dyn Responder>) -> Self {
        Self {
            registry,
            responder,
        }
    }

    /// Handles a gateway interaction. Anything other than a chat input
    /// command is ignored and yields `None`.
    pub async fn handle_interaction(&self, interaction: Interaction) -> Option<DispatchOutcome> {
        let ctx = InteractionContext::from_interaction(interaction, Arc::clone(&self.responder))?;
        Some(self.dispatch(ctx).await)
    }

    /// Executes the command with the context's name
    pub async fn dispatch(&self, mut ctx: InteractionContext) -> DispatchOutcome {
        let Some(command) = self.registry.get(ctx.command_name()) else {
            warn!(command = %ctx.command_name(), "No command matching the interaction was found");
            return DispatchOutcome::UnknownCommand;
        };

        debug!(command = %ctx.command_name(), "Executing command");
        match command.execute(&mut ctx).await {
            Ok(()) => DispatchOutcome::Executed,
            Err(e) => {
                error!(command = %ctx.command_name(), error = ?e, "Error executing command");
                ctx.safe_respond(GENERIC_ERROR, true).await;
                DispatchOutcome::Failed
            }
        }
    }
}
