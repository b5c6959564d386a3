//! Chat commands.
//!
//! Commands are registered statically in [`REGISTRY`]. The gateway layer
//! turns an interaction into an [`Invocation`], looks the command up by name
//! and sends back the [`Reply`]. Permission checks happen before dispatch.

use std::collections::HashMap;

use async_trait::async_trait;
use tarubot_core::types::Snowflake;
use tarubot_sync::SyncContext;

pub mod admin;
pub mod character;
pub mod config;
pub mod ping;

/// One command call, already flattened out of the platform's payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub user_id: Snowflake,
    /// `None` in direct messages.
    pub guild_id: Option<Snowflake>,
    pub subcommand: Option<String>,
    /// Option name to raw value.
    pub options: HashMap<String, String>,
}

impl Invocation {
    pub fn new(user_id: Snowflake, guild_id: Option<Snowflake>) -> Self {
        Self {
            user_id,
            guild_id,
            ..Self::default()
        }
    }

    pub fn subcommand(mut self, name: &str) -> Self {
        self.subcommand = Some(name.to_string());
        self
    }

    pub fn option(mut self, name: &str, value: impl Into<String>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    /// A trimmed, non-empty option value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// What to send back. Replies are private to the caller unless stated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
}

impl Reply {
    pub fn private(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }

    pub(crate) fn guild_only() -> Self {
        Self::private("This command can only be used in a server.")
    }

    pub(crate) fn missing_option(name: &str) -> Self {
        Self::private(format!("Missing required option `{name}`."))
    }

    pub(crate) fn unknown_subcommand() -> Self {
        Self::private("Unknown subcommand.")
    }
}

#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn execute(&self, ctx: &SyncContext, invocation: &Invocation) -> Reply;
}

/// Every command the bot answers to.
pub static REGISTRY: &[&dyn Command] = &[
    &ping::PingCommand,
    &character::CharacterCommand,
    &config::ConfigCommand,
    &admin::AdminCommand,
];

pub fn find(name: &str) -> Option<&'static dyn Command> {
    REGISTRY.iter().copied().find(|c| c.name() == name)
}

/// Run the named command, or reply that it does not exist.
pub async fn dispatch(ctx: &SyncContext, name: &str, invocation: &Invocation) -> Reply {
    match find(name) {
        Some(command) => {
            tracing::debug!(
                command = name,
                subcommand = ?invocation.subcommand,
                user_id = invocation.user_id,
                guild_id = ?invocation.guild_id,
                "Dispatching command"
            );
            command.execute(ctx, invocation).await
        }
        None => {
            tracing::warn!(command = name, "Unknown command");
            Reply::private("Unknown command.")
        }
    }
}
