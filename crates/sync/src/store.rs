//! The local persistence seam and its PostgreSQL implementation.

use async_trait::async_trait;
use tarubot_core::error::{SyncError, SyncResult};
use tarubot_core::types::{Snowflake, Timestamp};
use tarubot_db::models::character::{Character, CreateCharacter};
use tarubot_db::models::free_company::FreeCompany;
use tarubot_db::models::guild_config::{GuildConfig, UpsertGuildConfig};
use tarubot_db::repositories::{CharacterRepo, FreeCompanyRepo, GuildConfigRepo};
use tarubot_db::DbPool;

/// Durable storage for characters, Free Companies and guild settings.
///
/// Every call commits on its own; there are no multi-call transactions.
/// `last_synced_at` never moves backwards through an update.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get_character(&self, id: &str) -> SyncResult<Option<Character>>;

    async fn create_character(&self, input: &CreateCharacter) -> SyncResult<Character>;

    /// Overwrite name and FC reference (`None` clears it). Owner untouched.
    async fn update_character(
        &self,
        id: &str,
        name: &str,
        free_company_id: Option<&str>,
        synced_at: Timestamp,
    ) -> SyncResult<Option<Character>>;

    /// Set the owner only while the character has none. `None` when the row
    /// is missing or already owned.
    async fn set_character_owner(
        &self,
        id: &str,
        owner_id: Snowflake,
    ) -> SyncResult<Option<Character>>;

    /// Delete by id, restricted to `owner_id` when given. Returns rows removed.
    async fn delete_character(&self, id: &str, owner_id: Option<Snowflake>) -> SyncResult<u64>;

    async fn list_characters_by_owner(&self, owner_id: Snowflake) -> SyncResult<Vec<Character>>;

    async fn list_characters_by_free_company(
        &self,
        free_company_id: &str,
    ) -> SyncResult<Vec<Character>>;

    async fn get_free_company(&self, id: &str) -> SyncResult<Option<FreeCompany>>;

    async fn create_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<FreeCompany>;

    async fn update_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<Option<FreeCompany>>;

    /// Insert only if absent. Returns `true` when a row was inserted.
    async fn ensure_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<bool>;

    async fn get_guild_config(&self, guild_id: Snowflake) -> SyncResult<Option<GuildConfig>>;

    /// Create or partially update; only `Some` fields change.
    async fn upsert_guild_config(
        &self,
        guild_id: Snowflake,
        input: &UpsertGuildConfig,
    ) -> SyncResult<GuildConfig>;

    async fn list_guild_configs(&self) -> SyncResult<Vec<GuildConfig>>;
}

fn store_err(err: sqlx::Error) -> SyncError {
    SyncError::StoreFailure(err.to_string())
}

/// [`LocalStore`] over the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocalStore for PgStore {
    async fn get_character(&self, id: &str) -> SyncResult<Option<Character>> {
        CharacterRepo::find_by_id(&self.pool, id).await.map_err(store_err)
    }

    async fn create_character(&self, input: &CreateCharacter) -> SyncResult<Character> {
        CharacterRepo::create(&self.pool, input).await.map_err(store_err)
    }

    async fn update_character(
        &self,
        id: &str,
        name: &str,
        free_company_id: Option<&str>,
        synced_at: Timestamp,
    ) -> SyncResult<Option<Character>> {
        CharacterRepo::update_synced(&self.pool, id, name, free_company_id, synced_at)
            .await
            .map_err(store_err)
    }

    async fn set_character_owner(
        &self,
        id: &str,
        owner_id: Snowflake,
    ) -> SyncResult<Option<Character>> {
        CharacterRepo::set_owner(&self.pool, id, owner_id)
            .await
            .map_err(store_err)
    }

    async fn delete_character(&self, id: &str, owner_id: Option<Snowflake>) -> SyncResult<u64> {
        CharacterRepo::delete(&self.pool, id, owner_id)
            .await
            .map_err(store_err)
    }

    async fn list_characters_by_owner(&self, owner_id: Snowflake) -> SyncResult<Vec<Character>> {
        CharacterRepo::list_by_owner(&self.pool, owner_id)
            .await
            .map_err(store_err)
    }

    async fn list_characters_by_free_company(
        &self,
        free_company_id: &str,
    ) -> SyncResult<Vec<Character>> {
        CharacterRepo::list_by_free_company(&self.pool, free_company_id)
            .await
            .map_err(store_err)
    }

    async fn get_free_company(&self, id: &str) -> SyncResult<Option<FreeCompany>> {
        FreeCompanyRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_err)
    }

    async fn create_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<FreeCompany> {
        FreeCompanyRepo::create(&self.pool, id, name, synced_at)
            .await
            .map_err(store_err)
    }

    async fn update_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<Option<FreeCompany>> {
        FreeCompanyRepo::update(&self.pool, id, name, synced_at)
            .await
            .map_err(store_err)
    }

    async fn ensure_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<bool> {
        FreeCompanyRepo::ensure(&self.pool, id, name, synced_at)
            .await
            .map_err(store_err)
    }

    async fn get_guild_config(&self, guild_id: Snowflake) -> SyncResult<Option<GuildConfig>> {
        GuildConfigRepo::find(&self.pool, guild_id)
            .await
            .map_err(store_err)
    }

    async fn upsert_guild_config(
        &self,
        guild_id: Snowflake,
        input: &UpsertGuildConfig,
    ) -> SyncResult<GuildConfig> {
        GuildConfigRepo::upsert(&self.pool, guild_id, input)
            .await
            .map_err(store_err)
    }

    async fn list_guild_configs(&self) -> SyncResult<Vec<GuildConfig>> {
        GuildConfigRepo::list_all(&self.pool).await.map_err(store_err)
    }
}
