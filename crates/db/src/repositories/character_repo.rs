//! Repository for the `characters` table.

use sqlx::PgPool;
use tarubot_core::types::{Snowflake, Timestamp};

use crate::models::character::{Character, CreateCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, owner_id, free_company_id, last_synced_at, created_at, updated_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCharacter) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (id, name, owner_id, free_company_id, last_synced_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(input.owner_id)
            .bind(&input.free_company_id)
            .bind(input.last_synced_at)
            .fetch_one(pool)
            .await
    }

    /// Find a character by its Lodestone id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply refreshed Lodestone data: name, FC reference (may clear it) and
    /// sync time. The owner is never touched.
    ///
    /// `last_synced_at` only moves forward. Returns `None` if no row exists.
    pub async fn update_synced(
        pool: &PgPool,
        id: &str,
        name: &str,
        free_company_id: Option<&str>,
        synced_at: Timestamp,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = $2,
                free_company_id = $3,
                last_synced_at = GREATEST(last_synced_at, $4),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(name)
            .bind(free_company_id)
            .bind(synced_at)
            .fetch_optional(pool)
            .await
    }

    /// Assign an owner to an unowned character. Returns `None` if no row
    /// exists or the character already has an owner.
    pub async fn set_owner(
        pool: &PgPool,
        id: &str,
        owner_id: Snowflake,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET owner_id = $2, updated_at = NOW()
             WHERE id = $1 AND owner_id IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a character, optionally only when owned by `owner_id`.
    ///
    /// Returns the number of rows removed (0 or 1).
    pub async fn delete(
        pool: &PgPool,
        id: &str,
        owner_id: Option<Snowflake>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM characters
             WHERE id = $1 AND ($2::BIGINT IS NULL OR owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List all characters claimed by an owner, ordered by name.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Snowflake,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters
             WHERE owner_id = $1
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List all characters currently affiliated with a Free Company.
    pub async fn list_by_free_company(
        pool: &PgPool,
        free_company_id: &str,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters
             WHERE free_company_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(free_company_id)
            .fetch_all(pool)
            .await
    }
}
