//! `/character claimbyid | claimbyname | unclaim | list`

use async_trait::async_trait;
use tarubot_core::error::SyncError;
use tarubot_core::types::is_lodestone_id;
use tarubot_sync::claims::{self, ClaimOutcome, UnclaimOutcome};
use tarubot_sync::{RoleSyncOutcome, SyncContext};

use super::{Command, Invocation, Reply};

pub struct CharacterCommand;

#[async_trait]
impl Command for CharacterCommand {
    fn name(&self) -> &'static str {
        "character"
    }

    fn description(&self) -> &'static str {
        "Manage your claimed Final Fantasy XIV characters."
    }

    async fn execute(&self, ctx: &SyncContext, invocation: &Invocation) -> Reply {
        match invocation.subcommand.as_deref() {
            Some("claimbyid") => claim_by_id(ctx, invocation).await,
            Some("claimbyname") => claim_by_name(ctx, invocation).await,
            Some("unclaim") => unclaim(ctx, invocation).await,
            Some("list") => list(ctx, invocation).await,
            _ => Reply::unknown_subcommand(),
        }
    }
}

fn character_id(invocation: &Invocation) -> Result<&str, Reply> {
    let id = invocation.get("id").ok_or_else(|| Reply::missing_option("id"))?;
    if !is_lodestone_id(id) {
        return Err(Reply::private(format!("`{id}` is not a valid Lodestone ID.")));
    }
    Ok(id)
}

async fn claim_by_id(ctx: &SyncContext, invocation: &Invocation) -> Reply {
    let id = match character_id(invocation) {
        Ok(id) => id,
        Err(reply) => return reply,
    };

    match claims::claim_by_id(ctx, invocation.guild_id, invocation.user_id, id).await {
        Ok(outcome) => claim_reply(outcome),
        Err(e) => error_reply(&e, "claim the character by ID"),
    }
}

async fn claim_by_name(ctx: &SyncContext, invocation: &Invocation) -> Reply {
    let (Some(first), Some(last), Some(world)) = (
        invocation.get("firstname"),
        invocation.get("lastname"),
        invocation.get("world"),
    ) else {
        return Reply::private("First name, last name and world are all required.");
    };

    let outcome = claims::claim_by_name(
        ctx,
        invocation.guild_id,
        invocation.user_id,
        first,
        last,
        world,
    )
    .await;

    match outcome {
        Ok(ClaimOutcome::NoMatch) => Reply::private(format!(
            "Character \"{first} {last}\" on world \"{world}\" not found on Lodestone."
        )),
        Ok(ClaimOutcome::Ambiguous(hits)) => {
            let list = hits
                .iter()
                .map(|h| format!("- {} (ID: {})", h.name, h.id))
                .collect::<Vec<_>>()
                .join("\n");
            Reply::private(format!(
                "Multiple characters found for \"{first} {last}\" on world \"{world}\":\n{list}\n\
                 Please use `/character claimbyid` with the specific character ID."
            ))
        }
        Ok(outcome) => claim_reply(outcome),
        Err(e) => error_reply(&e, "claim the character by name"),
    }
}

async fn unclaim(ctx: &SyncContext, invocation: &Invocation) -> Reply {
    let id = match character_id(invocation) {
        Ok(id) => id,
        Err(reply) => return reply,
    };

    match claims::unclaim(ctx, invocation.guild_id, invocation.user_id, id).await {
        Ok(UnclaimOutcome::Unclaimed { character, roles }) => Reply::private(format!(
            "Successfully unclaimed {} (ID: {}).{}",
            character.name,
            character.id,
            roles_note(roles.as_ref())
        )),
        Ok(UnclaimOutcome::NotRecorded) => {
            Reply::private(format!("Character with ID {id} not found in our records."))
        }
        Ok(UnclaimOutcome::NotOwner(character)) => Reply::private(format!(
            "You cannot unclaim {} (ID: {}) as you are not the owner.",
            character.name, character.id
        )),
        Ok(UnclaimOutcome::NothingDeleted(character)) => Reply::private(format!(
            "Failed to unclaim {} (ID: {}). It may already have been unclaimed.",
            character.name, character.id
        )),
        Err(e) => error_reply(&e, "unclaim the character"),
    }
}

async fn list(ctx: &SyncContext, invocation: &Invocation) -> Reply {
    match claims::list_owned(ctx, invocation.user_id).await {
        Ok(characters) if characters.is_empty() => {
            Reply::private("You have not claimed any characters yet.")
        }
        Ok(characters) => {
            let list = characters
                .iter()
                .map(|c| format!("- {} (ID: {})", c.name, c.id))
                .collect::<Vec<_>>()
                .join("\n");
            Reply::private(format!("Your claimed characters:\n{list}"))
        }
        Err(e) => error_reply(&e, "list your characters"),
    }
}

fn claim_reply(outcome: ClaimOutcome) -> Reply {
    match outcome {
        ClaimOutcome::Claimed { character, roles } => Reply::private(format!(
            "Successfully claimed {} (ID: {})!{}",
            character.name,
            character.id,
            roles_note(roles.as_ref())
        )),
        ClaimOutcome::AlreadyOwned(character) => Reply::private(format!(
            "You have already claimed {} (ID: {}).",
            character.name, character.id
        )),
        ClaimOutcome::OwnedByOther(character) => Reply::private(format!(
            "{} (ID: {}) is already claimed by another user.",
            character.name, character.id
        )),
        ClaimOutcome::NotRecorded => {
            Reply::private("That character was removed while claiming it. Please try again.")
        }
        ClaimOutcome::NoMatch | ClaimOutcome::Ambiguous(_) => {
            Reply::private("No single character matched.")
        }
    }
}

fn roles_note(roles: Option<&RoleSyncOutcome>) -> &'static str {
    match roles {
        Some(outcome) if !outcome.is_clean() => " Your server roles could not be fully updated.",
        _ => "",
    }
}

fn error_reply(err: &SyncError, action: &str) -> Reply {
    match err {
        SyncError::NotFound { entity, id } => {
            Reply::private(format!("{} with ID {id} not found on Lodestone.", capitalize(entity)))
        }
        SyncError::Transport(_) | SyncError::Malformed(_) => {
            tracing::warn!(error = %err, action, "Lodestone unavailable");
            Reply::private(format!(
                "Could not {action}: the Lodestone is not reachable right now. Please try again later."
            ))
        }
        SyncError::StoreFailure(_) => {
            tracing::error!(error = %err, action, "Store failure");
            Reply::private(format!("An error occurred while trying to {action}."))
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
