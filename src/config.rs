//! Bot configuration, read from the environment.
//!
//! | Variable        | Required | Meaning                                   |
//! |-----------------|----------|-------------------------------------------|
//! | `DISCORD_TOKEN` | yes      | Bot token                                 |
//! | `CLIENT_ID`     | yes      | Application id                            |
//! | `GUILD_ID`      | no       | Deploy commands to this guild only        |
//! | `PREFIX`        | no       | Prefix of legacy text commands, `!`       |
//!
//! Empty values count as unset.

use std::fmt;

use twilight_model::id::{
    Id,
    marker::{ApplicationMarker, GuildMarker},
};

use crate::registry::DeployScope;

pub const DEFAULT_PREFIX: &str = "!";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),
    #[error("{name} must be a non-zero numeric id, got `{value}`")]
    InvalidId { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub client_id: Id<ApplicationMarker>,
    pub guild_id: Option<Id<GuildMarker>>,
    pub prefix: String,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        let client_id = get("CLIENT_ID").ok_or(ConfigError::Missing("CLIENT_ID"))?;
        let client_id = parse_id("CLIENT_ID", &client_id)?;
        let guild_id = get("GUILD_ID")
            .map(|value| parse_id("GUILD_ID", &value))
            .transpose()?;
        let prefix = get("PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Ok(Self {
            token,
            client_id,
            guild_id,
            prefix,
        })
    }

    pub fn deploy_scope(&self) -> DeployScope {
        match self.guild_id {
            Some(guild_id) => DeployScope::Guild(guild_id),
            None => DeployScope::Global,
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("guild_id", &self.guild_id)
            .field("prefix", &self.prefix)
            .finish()
    }
}

fn parse_id<T>(name: &'static str, value: &str) -> Result<Id<T>, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| ConfigError::InvalidId {
            name,
            value: value.to_string(),
        })
}
