//! Claiming and releasing characters.

use tarubot_core::error::SyncResult;
use tarubot_core::types::Snowflake;
use tarubot_db::models::character::Character;
use tarubot_lodestone::records::SearchHit;

use crate::cache::{resolve_character, store_character};
use crate::context::SyncContext;
use crate::roles::{resync_owner, RoleSyncOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// The character now belongs to the caller. `roles` is set when the
    /// claim happened inside a guild.
    Claimed {
        character: Character,
        roles: Option<RoleSyncOutcome>,
    },
    AlreadyOwned(Character),
    OwnedByOther(Character),
    /// The local record disappeared before the owner could be set.
    NotRecorded,
    /// The name search found nothing.
    NoMatch,
    /// The name search found several characters; claim one by id instead.
    Ambiguous(Vec<SearchHit>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnclaimOutcome {
    Unclaimed {
        character: Character,
        roles: Option<RoleSyncOutcome>,
    },
    /// No local record with that id.
    NotRecorded,
    NotOwner(Character),
    /// The ownership check passed but the delete matched no row.
    NothingDeleted(Character),
}

/// Claim a character by Lodestone id for `owner_id`.
pub async fn claim_by_id(
    ctx: &SyncContext,
    guild_id: Option<Snowflake>,
    owner_id: Snowflake,
    character_id: &str,
) -> SyncResult<ClaimOutcome> {
    let character = match ctx.store.get_character(character_id).await? {
        Some(existing) => match existing.owner_id {
            Some(owner) if owner == owner_id => return Ok(ClaimOutcome::AlreadyOwned(existing)),
            Some(_) => return Ok(ClaimOutcome::OwnedByOther(existing)),
            None => resolve_character(ctx, character_id).await?,
        },
        None => {
            let record = ctx.source.character(character_id).await?;
            store_character(ctx, character_id, &record, Some(owner_id), ctx.clock.now()).await?
        }
    };

    let character = match character.owner_id {
        Some(owner) if owner == owner_id => character,
        Some(_) => return Ok(ClaimOutcome::OwnedByOther(character)),
        None => match ctx.store.set_character_owner(character_id, owner_id).await? {
            Some(claimed) => claimed,
            None => return lost_claim(ctx, owner_id, character_id).await,
        },
    };

    tracing::info!(character_id, owner_id, "Character claimed");

    let roles = match guild_id {
        Some(guild_id) => Some(resync_owner(ctx, guild_id, owner_id).await),
        None => None,
    };

    Ok(ClaimOutcome::Claimed { character, roles })
}

/// The guarded owner update matched nothing: someone else claimed the row
/// first, or it was deleted. Report what the store holds now.
async fn lost_claim(
    ctx: &SyncContext,
    owner_id: Snowflake,
    character_id: &str,
) -> SyncResult<ClaimOutcome> {
    let outcome = match ctx.store.get_character(character_id).await? {
        Some(current) if current.owner_id == Some(owner_id) => ClaimOutcome::AlreadyOwned(current),
        Some(current) => ClaimOutcome::OwnedByOther(current),
        None => ClaimOutcome::NotRecorded,
    };
    tracing::info!(character_id, owner_id, "Claim lost to a concurrent update");
    Ok(outcome)
}

/// Claim by full name and world. Only a single search hit is claimed.
pub async fn claim_by_name(
    ctx: &SyncContext,
    guild_id: Option<Snowflake>,
    owner_id: Snowflake,
    first_name: &str,
    last_name: &str,
    world: &str,
) -> SyncResult<ClaimOutcome> {
    let mut hits = ctx.source.search_characters(first_name, last_name, world).await?;

    match hits.len() {
        0 => Ok(ClaimOutcome::NoMatch),
        1 => {
            let hit = hits.remove(0);
            claim_by_id(ctx, guild_id, owner_id, &hit.id).await
        }
        _ => Ok(ClaimOutcome::Ambiguous(hits)),
    }
}

/// Release a character the caller owns. The local record is deleted.
pub async fn unclaim(
    ctx: &SyncContext,
    guild_id: Option<Snowflake>,
    owner_id: Snowflake,
    character_id: &str,
) -> SyncResult<UnclaimOutcome> {
    let Some(character) = ctx.store.get_character(character_id).await? else {
        return Ok(UnclaimOutcome::NotRecorded);
    };

    if character.owner_id != Some(owner_id) {
        return Ok(UnclaimOutcome::NotOwner(character));
    }

    let deleted = ctx
        .store
        .delete_character(character_id, Some(owner_id))
        .await?;
    if deleted == 0 {
        return Ok(UnclaimOutcome::NothingDeleted(character));
    }

    tracing::info!(character_id, owner_id, "Character unclaimed");

    let roles = match guild_id {
        Some(guild_id) => Some(resync_owner(ctx, guild_id, owner_id).await),
        None => None,
    };

    Ok(UnclaimOutcome::Unclaimed { character, roles })
}

/// Characters claimed by `owner_id`, ordered by name.
pub async fn list_owned(ctx: &SyncContext, owner_id: Snowflake) -> SyncResult<Vec<Character>> {
    ctx.store.list_characters_by_owner(owner_id).await
}
