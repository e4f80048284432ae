use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    application::command::Command,
    channel::message::MessageFlags,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::{
        Id,
        marker::{ApplicationMarker, ChannelMarker, MessageMarker},
    },
    user::CurrentUser,
};

use crate::{
    executor::context::{InteractionHandle, Responder},
    registry::{CommandSync, DeployScope},
};

/// Discord REST client bound to one application.
#[derive(Clone)]
pub struct HttpPlatform {
    http: Arc<Client>,
    application_id: Id<ApplicationMarker>,
}

impl HttpPlatform {
    pub fn new(token: String, application_id: Id<ApplicationMarker>) -> Self {
        Self {
            http: Arc::new(Client::new(token)),
            application_id,
        }
    }

    /// Fetches the bot user. Fails when the token is rejected.
    pub async fn current_user(&self) -> Result<CurrentUser> {
        Ok(self.http.current_user().await?.model().await?)
    }

    /// Sends `content` to a channel as a reply to `message_id`.
    pub async fn reply_to_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        content: &str,
    ) -> Result<()> {
        self.http
            .create_message(channel_id)
            .reply(message_id)
            .content(content)
            .await?;
        Ok(())
    }

    async fn create_response(
        &self,
        handle: &InteractionHandle,
        response: &InteractionResponse,
    ) -> Result<()> {
        self.http
            .interaction(self.application_id)
            .create_response(handle.id, &handle.token, response)
            .await?;
        Ok(())
    }
}

fn flags(ephemeral: bool) -> Option<MessageFlags> {
    ephemeral.then_some(MessageFlags::EPHEMERAL)
}

#[async_trait]
impl Responder for HttpPlatform {
    async fn defer(&self, handle: &InteractionHandle) -> Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::DeferredChannelMessageWithSource,
            data: None,
        };
        self.create_response(handle, &response).await
    }

    async fn reply(&self, handle: &InteractionHandle, content: &str, ephemeral: bool) -> Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(InteractionResponseData {
                content: Some(content.to_string()),
                flags: flags(ephemeral),
                ..Default::default()
            }),
        };
        self.create_response(handle, &response).await
    }

    async fn follow_up(
        &self,
        handle: &InteractionHandle,
        content: &str,
        ephemeral: bool,
    ) -> Result<()> {
        let client = self.http.interaction(self.application_id);
        let mut request = client.create_followup(&handle.token).content(content);
        if let Some(flags) = flags(ephemeral) {
            request = request.flags(flags);
        }
        request.await?;
        Ok(())
    }

    async fn edit_reply(&self, handle: &InteractionHandle, content: &str) -> Result<()> {
        self.http
            .interaction(self.application_id)
            .update_response(&handle.token)
            .content(Some(content))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CommandSync for HttpPlatform {
    async fn set_commands(&self, scope: DeployScope, commands: Vec<Command>) -> Result<usize> {
        let client = self.http.interaction(self.application_id);
        let response = match scope {
            DeployScope::Global => client.set_global_commands(&commands).await?,
            DeployScope::Guild(guild_id) => client.set_guild_commands(guild_id, &commands).await?,
        };
        Ok(response.models().await?.len())
    }
}
