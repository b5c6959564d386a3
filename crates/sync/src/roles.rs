//! Applying member/guest role plans through the chat platform.
//!
//! Role changes are best effort. Every failure is logged and collected into
//! the returned [`RoleSyncOutcome`]; none of them is ever raised to the
//! caller, so a missing permission cannot abort a claim or a reconciliation.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use tarubot_core::roles::{RolePlan, RolePolicy};
use tarubot_core::types::{LodestoneId, Snowflake};

use crate::context::SyncContext;

/// A guild member as seen by the role provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub user_id: Snowflake,
    pub role_ids: Vec<Snowflake>,
}

/// Errors from the chat platform's role API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Role provider request failed: {0}")]
    Request(String),

    /// The platform returned a non-2xx status code.
    #[error("Role provider API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// A successful response that could not be understood.
    #[error("Malformed role provider response: {0}")]
    Malformed(String),
}

/// Guild membership and role mutation on the chat platform.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// `None` when the user is not a member of the guild.
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<Option<GuildMember>, RoleProviderError>;

    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<(), RoleProviderError>;

    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<(), RoleProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSyncStatus {
    /// The guild has neither role configured. No provider call was made.
    Disabled,
    /// The user is not in the guild. Nothing was changed.
    NotInGuild,
    /// The plan was computed and attempted; see `failures` for what broke.
    Evaluated,
    /// The member or its characters could not be loaded.
    Failed,
}

/// What a role synchronization did for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSyncOutcome {
    pub guild_id: Snowflake,
    pub owner_id: Snowflake,
    pub status: RoleSyncStatus,
    /// Changes that succeeded.
    pub applied: RolePlan,
    pub failures: Vec<String>,
}

impl RoleSyncOutcome {
    fn new(guild_id: Snowflake, owner_id: Snowflake, status: RoleSyncStatus) -> Self {
        Self {
            guild_id,
            owner_id,
            status,
            applied: RolePlan::default(),
            failures: Vec::new(),
        }
    }

    fn failed(guild_id: Snowflake, owner_id: Snowflake, failure: String) -> Self {
        let mut outcome = Self::new(guild_id, owner_id, RoleSyncStatus::Failed);
        outcome.failures.push(failure);
        outcome
    }

    pub fn is_evaluated(&self) -> bool {
        self.status == RoleSyncStatus::Evaluated
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Bring one owner's roles in line with `policy`.
///
/// `owned_fc_ids` holds the FC reference of each character the owner has
/// claimed. Add and remove are attempted independently of each other.
pub async fn sync_member_roles(
    ctx: &SyncContext,
    guild_id: Snowflake,
    owner_id: Snowflake,
    policy: &RolePolicy,
    owned_fc_ids: &[Option<LodestoneId>],
) -> RoleSyncOutcome {
    if !policy.manages_roles() {
        return RoleSyncOutcome::new(guild_id, owner_id, RoleSyncStatus::Disabled);
    }

    let member = match ctx.roles.fetch_member(guild_id, owner_id).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            tracing::debug!(guild_id, owner_id, "Owner is not in the guild, skipping roles");
            return RoleSyncOutcome::new(guild_id, owner_id, RoleSyncStatus::NotInGuild);
        }
        Err(e) => {
            tracing::warn!(guild_id, owner_id, error = %e, "Failed to fetch guild member");
            return RoleSyncOutcome::failed(guild_id, owner_id, format!("fetch member: {e}"));
        }
    };

    let held: HashSet<Snowflake> = member.role_ids.iter().copied().collect();
    let plan = policy.plan(owned_fc_ids, &held);
    let mut outcome = RoleSyncOutcome::new(guild_id, owner_id, RoleSyncStatus::Evaluated);

    if let Some(role_id) = plan.add {
        match ctx.roles.add_role(guild_id, owner_id, role_id).await {
            Ok(()) => outcome.applied.add = Some(role_id),
            Err(e) => {
                tracing::warn!(guild_id, owner_id, role_id, error = %e, "Failed to add role");
                outcome.failures.push(format!("add role {role_id}: {e}"));
            }
        }
    }

    if let Some(role_id) = plan.remove {
        match ctx.roles.remove_role(guild_id, owner_id, role_id).await {
            Ok(()) => outcome.applied.remove = Some(role_id),
            Err(e) => {
                tracing::warn!(guild_id, owner_id, role_id, error = %e, "Failed to remove role");
                outcome.failures.push(format!("remove role {role_id}: {e}"));
            }
        }
    }

    if !plan.is_noop() {
        tracing::info!(
            guild_id,
            owner_id,
            added = ?outcome.applied.add,
            removed = ?outcome.applied.remove,
            failures = outcome.failures.len(),
            "Synchronized member roles"
        );
    }

    outcome
}

/// Load the guild's policy and the owner's characters, then sync roles.
pub async fn resync_owner(
    ctx: &SyncContext,
    guild_id: Snowflake,
    owner_id: Snowflake,
) -> RoleSyncOutcome {
    let policy = match ctx.store.get_guild_config(guild_id).await {
        Ok(Some(config)) => config.role_policy(),
        Ok(None) => return RoleSyncOutcome::new(guild_id, owner_id, RoleSyncStatus::Disabled),
        Err(e) => {
            tracing::warn!(guild_id, owner_id, error = %e, "Failed to load guild config");
            return RoleSyncOutcome::failed(guild_id, owner_id, format!("load config: {e}"));
        }
    };

    resync_owner_with_policy(ctx, guild_id, owner_id, &policy).await
}

/// Like [`resync_owner`] with an already loaded policy.
pub async fn resync_owner_with_policy(
    ctx: &SyncContext,
    guild_id: Snowflake,
    owner_id: Snowflake,
    policy: &RolePolicy,
) -> RoleSyncOutcome {
    if !policy.manages_roles() {
        return RoleSyncOutcome::new(guild_id, owner_id, RoleSyncStatus::Disabled);
    }

    let owned = match ctx.store.list_characters_by_owner(owner_id).await {
        Ok(characters) => characters,
        Err(e) => {
            tracing::warn!(guild_id, owner_id, error = %e, "Failed to load owned characters");
            return RoleSyncOutcome::failed(guild_id, owner_id, format!("load characters: {e}"));
        }
    };

    let owned_fc_ids: Vec<Option<LodestoneId>> =
        owned.into_iter().map(|c| c.free_company_id).collect();

    sync_member_roles(ctx, guild_id, owner_id, policy, &owned_fc_ids).await
}
