//! Repository for the `free_companies` table.

use sqlx::PgPool;
use tarubot_core::types::Timestamp;

use crate::models::free_company::FreeCompany;

const COLUMNS: &str = "id, name, last_synced_at, created_at, updated_at";

pub struct FreeCompanyRepo;

impl FreeCompanyRepo {
    pub async fn create(
        pool: &PgPool,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> Result<FreeCompany, sqlx::Error> {
        let query = format!(
            "INSERT INTO free_companies (id, name, last_synced_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FreeCompany>(&query)
            .bind(id)
            .bind(name)
            .bind(synced_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<FreeCompany>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM free_companies WHERE id = $1");
        sqlx::query_as::<_, FreeCompany>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rename and stamp a Free Company. `last_synced_at` only moves forward.
    ///
    /// Returns `None` if no row exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> Result<Option<FreeCompany>, sqlx::Error> {
        let query = format!(
            "UPDATE free_companies SET
                name = $2,
                last_synced_at = GREATEST(last_synced_at, $3),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FreeCompany>(&query)
            .bind(id)
            .bind(name)
            .bind(synced_at)
            .fetch_optional(pool)
            .await
    }

    /// Insert a row only if none exists. Returns `true` if a row was inserted.
    pub async fn ensure(
        pool: &PgPool,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO free_companies (id, name, last_synced_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .bind(synced_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
