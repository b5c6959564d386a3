//! Free Company entity model.

use serde::Serialize;
use sqlx::FromRow;
use tarubot_core::types::{LodestoneId, Timestamp};

/// A row from the `free_companies` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FreeCompany {
    pub id: LodestoneId,
    pub name: String,
    pub last_synced_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
