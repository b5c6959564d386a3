//! Character entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tarubot_core::types::{LodestoneId, Snowflake, Timestamp};

/// A row from the `characters` table.
///
/// `id` is the Lodestone character id; it never changes once stored.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Character {
    pub id: LodestoneId,
    pub name: String,
    /// Chat user who claimed the character. `None` for characters discovered
    /// through a Free Company roster.
    pub owner_id: Option<Snowflake>,
    pub free_company_id: Option<LodestoneId>,
    pub last_synced_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new character.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    pub id: LodestoneId,
    pub name: String,
    pub owner_id: Option<Snowflake>,
    pub free_company_id: Option<LodestoneId>,
    pub last_synced_at: Timestamp,
}
