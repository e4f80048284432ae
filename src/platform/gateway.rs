use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{Result, bail};
use tracing::{debug, error, info, warn};
use twilight_gateway::{CloseFrame, Event, EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_model::channel::Message;

use super::HttpPlatform;
use crate::executor::{PrefixCommands, SlashDispatcher};

pub fn intents() -> Intents {
    Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT
}

/// Everything the event loop hands events to.
pub struct EventHandlers {
    pub slash: SlashDispatcher,
    pub prefix: PrefixCommands,
    pub platform: HttpPlatform,
}

impl EventHandlers {
    async fn handle_message(&self, message: Message) {
        let Some(reply) = self.prefix.execute(message.author.bot, &message.content) else {
            return;
        };
        if let Err(e) = self
            .platform
            .reply_to_message(message.channel_id, message.id, &reply)
            .await
        {
            error!(channel = %message.channel_id, error = ?e, "Error replying to message");
        }
    }

    fn handle_event(self: &Arc<Self>, event: Event) {
        match event {
            Event::Ready(ready) => {
                info!(user = %ready.user.name, guilds = ready.guilds.len(), "Bot is ready");
            }
            Event::InteractionCreate(interaction) => {
                let handlers = Arc::clone(self);
                tokio::spawn(async move {
                    if let Some(outcome) = handlers.slash.handle_interaction(interaction.0).await {
                        debug!(?outcome, "Interaction handled");
                    }
                });
            }
            Event::MessageCreate(message) => {
                let handlers = Arc::clone(self);
                tokio::spawn(async move { handlers.handle_message(message.0).await });
            }
            _ => {}
        }
    }
}

/// Connects a single shard and services events until `shutdown` completes.
///
/// Returns an error if the connection ends without a shutdown request.
pub async fn run<S>(token: String, handlers: Arc<EventHandlers>, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let mut shard = Shard::new(ShardId::ONE, token, intents());
    let sender = shard.sender();
    let closing = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&closing);
    tokio::spawn(async move {
        shutdown.await;
        info!("Shutting down");
        flag.store(true, Ordering::Relaxed);
        if let Err(e) = sender.close(CloseFrame::NORMAL) {
            warn!(error = ?e, "Shard already closed");
        }
    });

    info!("Connecting to the gateway");
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(Event::GatewayClose(_)) if closing.load(Ordering::Relaxed) => break,
            Ok(event) => event,
            Err(source) => {
                warn!(?source, "Error receiving event");
                continue;
            }
        };
        handlers.handle_event(event);
    }

    if closing.load(Ordering::Relaxed) {
        Ok(())
    } else {
        bail!("Gateway connection closed")
    }
}
