use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::error;
use twilight_model::{
    application::{
        command::CommandType,
        interaction::{Interaction, InteractionData, InteractionType},
    },
    id::{Id, marker::InteractionMarker},
};

use crate::{arguments::OptionValues, commands::CommandArgs};

/// Identifies the interaction a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionHandle {
    pub id: Id<InteractionMarker>,
    pub token: String,
}

/// The calls a command can make to answer an interaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Responder: Send + Sync {
    /// Acknowledges the interaction, showing a loading state to the user.
    async fn defer(&self, handle: &InteractionHandle) -> Result<()>;
    /// Sends the initial response.
    async fn reply(&self, handle: &InteractionHandle, content: &str, ephemeral: bool) -> Result<()>;
    /// Sends an additional message after the initial response.
    async fn follow_up(
        &self,
        handle: &InteractionHandle,
        content: &str,
        ephemeral: bool,
    ) -> Result<()>;
    /// Replaces the content of the initial response.
    async fn edit_reply(&self, handle: &InteractionHandle, content: &str) -> Result<()>;
}

/// A single chat input invocation along with its reply state.
pub struct InteractionContext {
    handle: InteractionHandle,
    command_name: String,
    options: OptionValues,
    responder: Arc<dyn Responder>,
    replied: bool,
    deferred: bool,
}

impl InteractionContext {
    pub fn new(
        handle: InteractionHandle,
        command_name: &str,
        options: OptionValues,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            handle,
            command_name: command_name.to_string(),
            options,
            responder,
            replied: false,
            deferred: false,
        }
    }

    /// Builds a context from a gateway interaction, returning `None` for
    /// anything that is not a chat input command.
    pub fn from_interaction(interaction: Interaction, responder: Arc<dyn Responder>) -> Option<Self> {
        if interaction.kind != InteractionType::ApplicationCommand {
            return None;
        }
        let Some(InteractionData::ApplicationCommand(data)) = interaction.data else {
            return None;
        };
        if data.kind != CommandType::ChatInput {
            return None;
        }

        let data = *data;
        let options = data
            .options
            .into_iter()
            .map(|option| (option.name, option.value))
            .collect();
        let handle = InteractionHandle {
            id: interaction.id,
            token: interaction.token,
        };
        Some(Self::new(handle, &data.name, options, responder))
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn options(&self) -> &OptionValues {
        &self.options
    }

    pub fn replied(&self) -> bool {
        self.replied
    }

    pub fn deferred(&self) -> bool {
        self.deferred
    }

    /// Parses the supplied options into the command's argument struct.
    pub fn args<C: CommandArgs>(&self) -> Result<C> {
        C::from_options(&self.options)
    }

    pub async fn defer_reply(&mut self) -> Result<()> {
        self.responder.defer(&self.handle).await?;
        self.deferred = true;
        Ok(())
    }

    pub async fn reply(&mut self, content: &str, ephemeral: bool) -> Result<()> {
        self.responder.reply(&self.handle, content, ephemeral).await?;
        self.replied = true;
        Ok(())
    }

    pub async fn follow_up(&mut self, content: &str, ephemeral: bool) -> Result<()> {
        self.responder
            .follow_up(&self.handle, content, ephemeral)
            .await
    }

    pub async fn edit_reply(&mut self, content: &str) -> Result<()> {
        self.responder.edit_reply(&self.handle, content).await?;
        self.replied = true;
        Ok(())
    }

    /// Replies, or follows up when the interaction was already answered or deferred.
    pub async fn respond(&mut self, content: &str, ephemeral: bool) -> Result<()> {
        if self.replied || self.deferred {
            self.follow_up(content, ephemeral).await
        } else {
            self.reply(content, ephemeral).await
        }
    }

    /// Like [`respond`](Self::respond), but failures are only logged.
    pub async fn safe_respond(&mut self, content: &str, ephemeral: bool) {
        if let Err(e) = self.respond(content, ephemeral).await {
            error!(command = %self.command_name, error = ?e, "Error replying to interaction");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use mockall::predicate::eq;
    use rstest::rstest;
    use twilight_model::{
        application::interaction::{
            application_command::{CommandData, CommandDataOption, CommandOptionValue},
            message_component::MessageComponentInteractionData,
        },
        channel::message::component::ComponentType,
        oauth::ApplicationIntegrationMap,
    };

    use super::*;

    fn string_option(name: &str, value: &str) -> CommandDataOption {
        CommandDataOption {
            name: name.to_string(),
            value: CommandOptionValue::String(value.to_string()),
        }
    }

    pub(crate) fn command_data(kind: CommandType) -> InteractionData {
        InteractionData::ApplicationCommand(Box::new(CommandData {
            guild_id: None,
            id: Id::new(3),
            name: "prompt".to_string(),
            kind,
            options: vec![
                string_option("prompt", "hi"),
                string_option("model", "gemini-2.5-flash-lite"),
            ],
            resolved: None,
            target_id: (kind == CommandType::Message).then(|| Id::new(4)),
        }))
    }

    fn component_data() -> InteractionData {
        InteractionData::MessageComponent(Box::new(MessageComponentInteractionData {
            custom_id: "button".to_string(),
            component_type: ComponentType::Button,
            resolved: None,
            values: Vec::new(),
        }))
    }

    #[allow(deprecated)]
    pub(crate) fn interaction(kind: InteractionType, data: InteractionData) -> Interaction {
        Interaction {
            app_permissions: None,
            application_id: Id::new(2),
            authorizing_integration_owners: ApplicationIntegrationMap {
                guild: None,
                user: None,
            },
            channel: None,
            channel_id: None,
            context: None,
            data: Some(data),
            entitlements: Vec::new(),
            guild: None,
            guild_id: None,
            guild_locale: None,
            id: Id::new(1),
            kind,
            locale: None,
            member: None,
            message: None,
            token: "token".to_string(),
            user: None,
        }
    }

    #[rstest]
    #[case::autocomplete(
        InteractionType::ApplicationCommandAutocomplete,
        command_data(CommandType::ChatInput)
    )]
    #[case::component(InteractionType::MessageComponent, component_data())]
    #[case::message_command(
        InteractionType::ApplicationCommand,
        command_data(CommandType::Message)
    )]
    fn ignores_everything_but_chat_input(
        #[case] kind: InteractionType,
        #[case] data: InteractionData,
    ) {
        let responder = Arc::new(MockResponder::new());
        let ctx = InteractionContext::from_interaction(interaction(kind, data), responder);
        assert!(ctx.is_none());
    }

    #[test]
    fn chat_input_becomes_a_context() {
        let responder = Arc::new(MockResponder::new());
        let ctx = InteractionContext::from_interaction(
            interaction(
                InteractionType::ApplicationCommand,
                command_data(CommandType::ChatInput),
            ),
            responder,
        )
        .unwrap();

        let expected = OptionValues::from([
            (
                "prompt".to_string(),
                CommandOptionValue::String("hi".to_string()),
            ),
            (
                "model".to_string(),
                CommandOptionValue::String("gemini-2.5-flash-lite".to_string()),
            ),
        ]);
        assert_eq!(ctx.command_name(), "prompt");
        assert_eq!(ctx.options(), &expected);
        assert_eq!(ctx.handle, handle());
        assert!(!ctx.replied());
        assert!(!ctx.deferred());
    }

    fn handle() -> InteractionHandle {
        InteractionHandle {
            id: Id::new(1),
            token: "token".to_string(),
        }
    }

    fn context(responder: MockResponder) -> InteractionContext {
        InteractionContext::new(handle(), "test", OptionValues::new(), Arc::new(responder))
    }

    #[tokio::test]
    async fn fresh_interaction_responds_with_reply() {
        let mut responder = MockResponder::new();
        responder
            .expect_reply()
            .with(eq(handle()), eq("hello"), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(()));
        responder.expect_follow_up().never();

        let mut ctx = context(responder);
        ctx.respond("hello", false).await.unwrap();

        assert!(ctx.replied());
        assert!(!ctx.deferred());
    }

    #[tokio::test]
    async fn deferred_interaction_responds_with_follow_up() {
        let mut responder = MockResponder::new();
        responder.expect_defer().times(1).returning(|_| Ok(()));
        responder
            .expect_follow_up()
            .with(eq(handle()), eq("later"), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(()));
        responder.expect_reply().never();

        let mut ctx = context(responder);
        ctx.defer_reply().await.unwrap();
        ctx.respond("later", true).await.unwrap();

        assert!(ctx.deferred());
    }

    #[tokio::test]
    async fn failed_defer_leaves_state_untouched() {
        let mut responder = MockResponder::new();
        responder
            .expect_defer()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("unknown interaction")));

        let mut ctx = context(responder);
        assert!(ctx.defer_reply().await.is_err());
        assert!(!ctx.deferred());
    }

    #[tokio::test]
    async fn safe_respond_swallows_transport_errors() {
        let mut responder = MockResponder::new();
        responder
            .expect_reply()
            .times(1)
            .returning(|_, _, _| Err(anyhow::anyhow!("connection reset")));

        let mut ctx = context(responder);
        ctx.safe_respond("hello", false).await;

        assert!(!ctx.replied());
    }
}
