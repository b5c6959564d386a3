//! Read-through freshness cache over the local store.
//!
//! A fresh local record is served without touching the Lodestone. Anything
//! else costs exactly one fetch, after which the local record is rewritten
//! with `last_synced_at = now`. A `NotFound` from the Lodestone leaves the
//! local record exactly as it was.

use chrono::{DateTime, Utc};
use tarubot_core::error::SyncResult;
use tarubot_core::freshness::is_fresh;
use tarubot_core::types::{Snowflake, Timestamp};
use tarubot_db::models::character::{Character, CreateCharacter};
use tarubot_db::models::free_company::FreeCompany;
use tarubot_lodestone::records::{CharacterRecord, FreeCompanyRef};

use crate::context::SyncContext;

/// Which kind of Lodestone entity to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Character,
    FreeCompany,
}

/// A resolved local record.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Character(Character),
    FreeCompany(FreeCompany),
}

impl Resolved {
    pub fn last_synced_at(&self) -> Timestamp {
        match self {
            Self::Character(c) => c.last_synced_at,
            Self::FreeCompany(fc) => fc.last_synced_at,
        }
    }
}

/// Resolve any entity kind by Lodestone id.
pub async fn resolve(ctx: &SyncContext, kind: EntityKind, id: &str) -> SyncResult<Resolved> {
    match kind {
        EntityKind::Character => resolve_character(ctx, id).await.map(Resolved::Character),
        EntityKind::FreeCompany => resolve_free_company(ctx, id)
            .await
            .map(Resolved::FreeCompany),
    }
}

/// Return the local character, refreshing it first when stale or absent.
///
/// A character created here has no owner; an existing owner is preserved.
pub async fn resolve_character(ctx: &SyncContext, id: &str) -> SyncResult<Character> {
    let now = ctx.clock.now();
    let local = ctx.store.get_character(id).await?;

    if let Some(character) = local.as_ref().filter(|c| is_fresh(c.last_synced_at, now)) {
        tracing::debug!(character_id = %id, "Character served from cache");
        return Ok(character.clone());
    }

    tracing::debug!(character_id = %id, cached = local.is_some(), "Refreshing character");
    let record = ctx.source.character(id).await?;
    store_character(ctx, id, &record, None, now).await
}

/// Return the local Free Company, refreshing it first when stale or absent.
pub async fn resolve_free_company(ctx: &SyncContext, id: &str) -> SyncResult<FreeCompany> {
    let now = ctx.clock.now();
    let local = ctx.store.get_free_company(id).await?;

    if let Some(fc) = local.as_ref().filter(|fc| is_fresh(fc.last_synced_at, now)) {
        tracing::debug!(fc_id = %id, "Free company served from cache");
        return Ok(fc.clone());
    }

    tracing::debug!(fc_id = %id, cached = local.is_some(), "Refreshing free company");
    let record = ctx.source.free_company(id).await?;

    if local.is_some() {
        if let Some(updated) = ctx.store.update_free_company(id, &record.name, now).await? {
            return Ok(updated);
        }
    }
    ctx.store.create_free_company(id, &record.name, now).await
}

/// Write a freshly fetched character profile, creating the row if needed.
///
/// `owner_id` only applies when the row is created.
pub(crate) async fn store_character(
    ctx: &SyncContext,
    id: &str,
    record: &CharacterRecord,
    owner_id: Option<Snowflake>,
    now: Timestamp,
) -> SyncResult<Character> {
    if let Some(fc) = &record.free_company {
        ensure_free_company_row(ctx, fc).await?;
    }

    let fc_id = record.free_company_id();
    if let Some(updated) = ctx
        .store
        .update_character(id, &record.name, fc_id, now)
        .await?
    {
        return Ok(updated);
    }

    ctx.store
        .create_character(&CreateCharacter {
            id: id.to_string(),
            name: record.name.clone(),
            owner_id,
            free_company_id: fc_id.map(str::to_string),
            last_synced_at: now,
        })
        .await
}

/// Insert a placeholder row for an FC referenced by a character but not yet
/// stored. It is born stale so the next FC resolve fetches the real profile.
async fn ensure_free_company_row(ctx: &SyncContext, fc: &FreeCompanyRef) -> SyncResult<()> {
    let name = fc
        .name
        .clone()
        .unwrap_or_else(|| format!("Free Company {}", fc.id));

    if ctx.store.ensure_free_company(&fc.id, &name, never_synced()).await? {
        tracing::debug!(fc_id = %fc.id, "Inserted placeholder free company");
    }
    Ok(())
}

fn never_synced() -> Timestamp {
    DateTime::<Utc>::UNIX_EPOCH
}
