//! `/config memberrole | guestrole | fcid` (guild only)

use async_trait::async_trait;
use tarubot_core::types::{is_lodestone_id, Snowflake};
use tarubot_sync::{settings, SyncContext};

use super::{Command, Invocation, Reply};

pub struct ConfigCommand;

#[async_trait]
impl Command for ConfigCommand {
    fn name(&self) -> &'static str {
        "config"
    }

    fn description(&self) -> &'static str {
        "Configure the bot for this server."
    }

    async fn execute(&self, ctx: &SyncContext, invocation: &Invocation) -> Reply {
        let Some(guild_id) = invocation.guild_id else {
            return Reply::guild_only();
        };

        let result = match invocation.subcommand.as_deref() {
            Some("memberrole") => match role_option(invocation) {
                Ok(role_id) => settings::set_member_role(ctx, guild_id, role_id)
                    .await
                    .map(|_| format!("Successfully set the member role to <@&{role_id}>.")),
                Err(reply) => return reply,
            },
            Some("guestrole") => match role_option(invocation) {
                Ok(role_id) => settings::set_guest_role(ctx, guild_id, role_id)
                    .await
                    .map(|_| format!("Successfully set the guest role to <@&{role_id}>.")),
                Err(reply) => return reply,
            },
            Some("fcid") => {
                let Some(fc_id) = invocation.get("id") else {
                    return Reply::missing_option("id");
                };
                if !is_lodestone_id(fc_id) {
                    return Reply::private(format!("`{fc_id}` is not a valid Free Company ID."));
                }
                settings::set_free_company(ctx, guild_id, fc_id)
                    .await
                    .map(|_| format!("Successfully set the Free Company ID to {fc_id}."))
            }
            _ => return Reply::unknown_subcommand(),
        };

        match result {
            Ok(message) => Reply::private(message),
            Err(e) => {
                tracing::error!(guild_id, error = %e, "Failed to update guild config");
                Reply::private("An error occurred while updating the server configuration.")
            }
        }
    }
}

fn role_option(invocation: &Invocation) -> Result<Snowflake, Reply> {
    let raw = invocation.get("role").ok_or_else(|| Reply::missing_option("role"))?;
    raw.parse()
        .map_err(|_| Reply::private(format!("`{raw}` is not a valid role.")))
}
