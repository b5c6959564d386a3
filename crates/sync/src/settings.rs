//! Per-guild role settings. Each setter changes one field only.

use tarubot_core::error::SyncResult;
use tarubot_core::types::Snowflake;
use tarubot_db::models::guild_config::{GuildConfig, UpsertGuildConfig};

use crate::context::SyncContext;

pub async fn set_member_role(
    ctx: &SyncContext,
    guild_id: Snowflake,
    role_id: Snowflake,
) -> SyncResult<GuildConfig> {
    let input = UpsertGuildConfig {
        member_role_id: Some(role_id),
        ..Default::default()
    };
    let config = ctx.store.upsert_guild_config(guild_id, &input).await?;
    tracing::info!(guild_id, role_id, "Member role configured");
    Ok(config)
}

pub async fn set_guest_role(
    ctx: &SyncContext,
    guild_id: Snowflake,
    role_id: Snowflake,
) -> SyncResult<GuildConfig> {
    let input = UpsertGuildConfig {
        guest_role_id: Some(role_id),
        ..Default::default()
    };
    let config = ctx.store.upsert_guild_config(guild_id, &input).await?;
    tracing::info!(guild_id, role_id, "Guest role configured");
    Ok(config)
}

/// Set the Free Company whose members get the member role.
pub async fn set_free_company(
    ctx: &SyncContext,
    guild_id: Snowflake,
    fc_id: &str,
) -> SyncResult<GuildConfig> {
    let input = UpsertGuildConfig {
        free_company_id: Some(fc_id.to_string()),
        ..Default::default()
    };
    let config = ctx.store.upsert_guild_config(guild_id, &input).await?;
    tracing::info!(guild_id, fc_id, "Free company configured");
    Ok(config)
}
