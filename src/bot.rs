use std::{pin::Pin, sync::Arc};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    commands::prompt::PromptCommand,
    config::BotConfig,
    executor::{PrefixCommands, SlashDispatcher},
    generator::ResponseGenerator,
    models::ModelCatalog,
    platform::{
        HttpPlatform,
        gateway::{self, EventHandlers},
    },
    registry::{CommandRegistry, RegistryError},
};

/// Builds the registry with every slash command the bot ships with.
pub fn build_registry(
    catalog: Arc<ModelCatalog>,
    generator: Arc<dyn ResponseGenerator>,
) -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();
    registry.register(PromptCommand::new(catalog, generator))?;
    Ok(registry)
}

pub struct Bot {
    config: BotConfig,
    registry: Arc<CommandRegistry>,
    platform: HttpPlatform,
    handlers: Arc<EventHandlers>,
}

impl Bot {
    pub fn new(
        config: BotConfig,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Result<Self, RegistryError> {
        let catalog = Arc::new(ModelCatalog::default());
        let registry = Arc::new(build_registry(catalog, generator)?);
        let platform = HttpPlatform::new(config.token.clone(), config.client_id);
        let handlers = Arc::new(EventHandlers {
            slash: SlashDispatcher::new(Arc::clone(&registry), Arc::new(platform.clone())),
            prefix: PrefixCommands::with_defaults(&config.prefix),
            platform: platform.clone(),
        });

        Ok(Self {
            config,
            registry,
            platform,
            handlers,
        })
    }

    /// Deploys the commands, logs in and serves events until `shutdown` completes.
    ///
    /// A failed deploy is logged and startup continues; a rejected token or a
    /// lost gateway connection is returned as an error. A shutdown requested
    /// while deploying or logging in stops the bot without connecting.
    pub async fn start<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown = Box::pin(shutdown);

        let login = async {
            self.registry
                .deploy(&self.platform, self.config.deploy_scope())
                .await;
            self.platform
                .current_user()
                .await
                .context("Failed to log in")
        };
        let Some(user) = unless_shutdown(login, &mut shutdown).await else {
            info!("Shutdown requested during startup");
            return Ok(());
        };
        let user = user?;
        info!(user = %user.name, id = %user.id, "Logged in");

        gateway::run(self.config.token.clone(), Arc::clone(&self.handlers), shutdown).await
    }
}

/// Runs `work` to completion unless `shutdown` completes first.
async fn unless_shutdown<T, F, S>(work: F, shutdown: &mut Pin<Box<S>>) -> Option<T>
where
    F: Future<Output = T>,
    S: Future<Output = ()>,
{
    tokio::select! {
        output = work => Some(output),
        _ = shutdown.as_mut() => None,
    }
}

/// Completes on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = ?e, "Unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = ?e, "Unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
