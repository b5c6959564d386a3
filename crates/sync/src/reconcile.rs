//! Free Company roster reconciliation.
//!
//! Makes the local characters of one Free Company match its Lodestone
//! roster. Each write commits on its own; a failure stops the run and hands
//! back what was already committed. Running again converges.

use std::collections::HashSet;

use tarubot_core::error::SyncResult;
use tarubot_core::reconciliation::{departed_members, ReconcileFailure, ReconcileReport};
use tarubot_core::types::LodestoneId;
use tarubot_db::models::character::CreateCharacter;
use tracing::Instrument;
use uuid::Uuid;

use crate::context::SyncContext;

/// Reconcile the local characters of `fc_id` against its current roster.
pub async fn reconcile_free_company(
    ctx: &SyncContext,
    fc_id: &str,
) -> Result<ReconcileReport, ReconcileFailure> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("reconcile", %run_id, fc_id = %fc_id);

    async move {
        let mut report = ReconcileReport::new(fc_id.to_string());

        match run(ctx, fc_id, &mut report).await {
            Ok(()) => {
                tracing::info!(
                    confirmed = report.confirmed,
                    created = report.created,
                    removed = report.removed,
                    affected_owners = report.affected_owners.len(),
                    "Free company reconciled"
                );
                Ok(report)
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    confirmed = report.confirmed,
                    created = report.created,
                    removed = report.removed,
                    "Free company reconciliation aborted"
                );
                Err(ReconcileFailure {
                    partial: report,
                    error,
                })
            }
        }
    }
    .instrument(span)
    .await
}

async fn run(ctx: &SyncContext, fc_id: &str, report: &mut ReconcileReport) -> SyncResult<()> {
    let now = ctx.clock.now();

    // 1. The FC's own profile, always refetched.
    let profile = ctx.source.free_company(fc_id).await?;
    if ctx
        .store
        .update_free_company(fc_id, &profile.name, now)
        .await?
        .is_none()
    {
        ctx.store
            .create_free_company(fc_id, &profile.name, now)
            .await?;
    }
    report.free_company_name = Some(profile.name);

    // 2. The whole roster.
    let roster = ctx.source.free_company_members(fc_id).await?;
    tracing::debug!(members = roster.len(), "Fetched roster");

    // 3. Confirm or create every roster member. Repeated ids are handled once.
    let mut roster_ids: HashSet<LodestoneId> = HashSet::with_capacity(roster.len());
    for member in &roster {
        if !roster_ids.insert(member.id.clone()) {
            tracing::debug!(character_id = %member.id, "Skipping repeated roster entry");
            continue;
        }

        let existing = ctx.store.get_character(&member.id).await?;
        let updated = match existing {
            Some(_) => {
                ctx.store
                    .update_character(&member.id, &member.name, Some(fc_id), now)
                    .await?
            }
            None => None,
        };

        match updated {
            Some(character) => {
                report.confirmed += 1;
                report.touch_owner(character.owner_id);
            }
            None => {
                ctx.store
                    .create_character(&CreateCharacter {
                        id: member.id.clone(),
                        name: member.name.clone(),
                        owner_id: None,
                        free_company_id: Some(fc_id.to_string()),
                        last_synced_at: now,
                    })
                    .await?;
                report.created += 1;
            }
        }
    }

    // 4. Locally recorded members that left: clear the FC, keep the owner.
    let local = ctx.store.list_characters_by_free_company(fc_id).await?;
    let departed: HashSet<LodestoneId> =
        departed_members(local.iter().map(|c| &c.id), &roster_ids)
            .into_iter()
            .collect();

    for character in local.into_iter().filter(|c| departed.contains(&c.id)) {
        // The previous sync time is kept: nothing was fetched for this row.
        ctx.store
            .update_character(&character.id, &character.name, None, character.last_synced_at)
            .await?;
        report.removed += 1;
        report.touch_owner(character.owner_id);
        tracing::debug!(
            character_id = %character.id,
            owner_id = ?character.owner_id,
            "Member left free company"
        );
    }

    Ok(())
}
