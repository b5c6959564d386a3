//! Per-guild role settings.

use serde::Serialize;
use sqlx::FromRow;
use tarubot_core::roles::RolePolicy;
use tarubot_core::types::{LodestoneId, Snowflake, Timestamp};

/// A row from the `guild_configs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct GuildConfig {
    pub guild_id: Snowflake,
    pub member_role_id: Option<Snowflake>,
    pub guest_role_id: Option<Snowflake>,
    pub free_company_id: Option<LodestoneId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GuildConfig {
    pub fn role_policy(&self) -> RolePolicy {
        RolePolicy {
            member_role_id: self.member_role_id,
            guest_role_id: self.guest_role_id,
            free_company_id: self.free_company_id.clone(),
        }
    }
}

/// Partial update for a guild's settings. `None` fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpsertGuildConfig {
    pub member_role_id: Option<Snowflake>,
    pub guest_role_id: Option<Snowflake>,
    pub free_company_id: Option<LodestoneId>,
}
