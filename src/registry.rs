use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};
use twilight_model::{
    application::command::Command,
    id::{Id, marker::GuildMarker},
};

use crate::commands::{CommandDescriptor, SlashCommand};

/// Where a command set is deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployScope {
    Global,
    Guild(Id<GuildMarker>),
}

/// Replaces the full command set of a scope in one call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandSync: Send + Sync {
    /// Returns the number of commands Discord acknowledged.
    async fn set_commands(&self, scope: DeployScope, commands: Vec<Command>) -> Result<usize>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A command named `{0}` is already registered")]
    DuplicateName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed(usize),
    Failed,
}

/// The slash commands known to the bot, in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn SlashCommand>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command, rejecting names that are already taken.
    pub fn register<C: SlashCommand + 'static>(&mut self, command: C) -> Result<(), RegistryError> {
        let name = command.descriptor().name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.index.insert(name, self.commands.len());
        self.commands.push(Box::new(command));
        Ok(())
    }

    /// A copy of every registered descriptor.
    pub fn list(&self) -> Vec<CommandDescriptor> {
        self.commands
            .iter()
            .map(|command| command.descriptor().clone())
            .collect()
    }

    /// Gets a registered command by its exact name.
    pub fn get(&self, name: &str) -> Option<&dyn SlashCommand> {
        self.index
            .get(name)
            .and_then(|&i| self.commands.get(i))
            .map(|command| command.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Realizes the registry into a list of `Command`s for registration with Discord
    pub fn build_commands(&self) -> Vec<Command> {
        self.commands
            .iter()
            .map(|command| command.descriptor().to_command())
            .collect()
    }

    /// Pushes every command to Discord.
    ///
    /// Failures are logged and reported through the outcome, never returned as
    /// errors: commands from an earlier deploy keep working.
    pub async fn deploy(&self, sync: &dyn CommandSync, scope: DeployScope) -> DeployOutcome {
        info!(
            count = self.len(),
            ?scope,
            "Started refreshing application (/) commands"
        );

        match sync.set_commands(scope, self.build_commands()).await {
            Ok(count) => {
                info!(count, "Successfully reloaded application (/) commands");
                DeployOutcome::Deployed(count)
            }
            Err(e) => {
                error!(error = ?e, "Error deploying commands");
                DeployOutcome::Failed
            }
        }
    }
}
