//! Reconcile a Free Company and then fix up roles for everyone it touched.

use serde::Serialize;
use tarubot_core::reconciliation::{ReconcileFailure, ReconcileReport};
use tarubot_core::types::Snowflake;

use crate::context::SyncContext;
use crate::reconcile::reconcile_free_company;
use crate::roles::{resync_owner_with_policy, RoleSyncOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub report: ReconcileReport,
    /// Affected owners that were found in the guild and evaluated.
    pub roles_evaluated: usize,
    /// Owners whose role sync hit at least one failure.
    pub role_failures: usize,
}

/// Reconcile `fc_id`, then resync roles in `guild_id` for each affected
/// owner, one after another. Role problems are counted, never raised.
pub async fn refresh_free_company_members(
    ctx: &SyncContext,
    guild_id: Snowflake,
    fc_id: &str,
) -> Result<RefreshSummary, ReconcileFailure> {
    let report = reconcile_free_company(ctx, fc_id).await?;

    let mut summary = RefreshSummary {
        roles_evaluated: 0,
        role_failures: 0,
        report,
    };

    if summary.report.affected_owners.is_empty() {
        return Ok(summary);
    }

    let policy = match ctx.store.get_guild_config(guild_id).await {
        Ok(config) => config.map(|c| c.role_policy()).unwrap_or_default(),
        Err(e) => {
            tracing::warn!(
                guild_id,
                fc_id,
                error = %e,
                "Failed to load guild config for role sync"
            );
            summary.role_failures = summary.report.affected_owners.len();
            return Ok(summary);
        }
    };

    for &owner_id in &summary.report.affected_owners {
        let outcome: RoleSyncOutcome =
            resync_owner_with_policy(ctx, guild_id, owner_id, &policy).await;
        if outcome.is_evaluated() {
            summary.roles_evaluated += 1;
        }
        if !outcome.is_clean() {
            summary.role_failures += 1;
        }
    }

    tracing::info!(
        guild_id,
        fc_id,
        roles_evaluated = summary.roles_evaluated,
        role_failures = summary.role_failures,
        "Free company refresh finished"
    );

    Ok(summary)
}
