//! Repository for the `guild_configs` table.

use sqlx::PgPool;
use tarubot_core::types::Snowflake;

use crate::models::guild_config::{GuildConfig, UpsertGuildConfig};

const COLUMNS: &str =
    "guild_id, member_role_id, guest_role_id, free_company_id, created_at, updated_at";

pub struct GuildConfigRepo;

impl GuildConfigRepo {
    pub async fn find(
        pool: &PgPool,
        guild_id: Snowflake,
    ) -> Result<Option<GuildConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guild_configs WHERE guild_id = $1");
        sqlx::query_as::<_, GuildConfig>(&query)
            .bind(guild_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a guild's settings. Only non-`None` fields in
    /// `input` overwrite existing values.
    pub async fn upsert(
        pool: &PgPool,
        guild_id: Snowflake,
        input: &UpsertGuildConfig,
    ) -> Result<GuildConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO guild_configs (guild_id, member_role_id, guest_role_id, free_company_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (guild_id) DO UPDATE SET
                member_role_id = COALESCE(EXCLUDED.member_role_id, guild_configs.member_role_id),
                guest_role_id = COALESCE(EXCLUDED.guest_role_id, guild_configs.guest_role_id),
                free_company_id = COALESCE(EXCLUDED.free_company_id, guild_configs.free_company_id),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuildConfig>(&query)
            .bind(guild_id)
            .bind(input.member_role_id)
            .bind(input.guest_role_id)
            .bind(&input.free_company_id)
            .fetch_one(pool)
            .await
    }

    /// All guilds that have any settings stored, ordered by guild id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<GuildConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guild_configs ORDER BY guild_id ASC");
        sqlx::query_as::<_, GuildConfig>(&query).fetch_all(pool).await
    }
}
