//! The data-source seam used by the sync layer.

use async_trait::async_trait;

use crate::api::LodestoneApi;
use crate::error::LodestoneError;
use crate::records::{CharacterRecord, FreeCompanyRecord, MemberRecord, SearchHit};

/// Read-only access to Lodestone data. Listing methods return every page.
#[async_trait]
pub trait LodestoneSource: Send + Sync {
    async fn character(&self, id: &str) -> Result<CharacterRecord, LodestoneError>;

    async fn search_characters(
        &self,
        first_name: &str,
        last_name: &str,
        world: &str,
    ) -> Result<Vec<SearchHit>, LodestoneError>;

    async fn free_company(&self, id: &str) -> Result<FreeCompanyRecord, LodestoneError>;

    async fn free_company_members(&self, id: &str) -> Result<Vec<MemberRecord>, LodestoneError>;
}

#[async_trait]
impl LodestoneSource for LodestoneApi {
    async fn character(&self, id: &str) -> Result<CharacterRecord, LodestoneError> {
        self.fetch_character(id).await
    }

    async fn search_characters(
        &self,
        first_name: &str,
        last_name: &str,
        world: &str,
    ) -> Result<Vec<SearchHit>, LodestoneError> {
        LodestoneApi::search_characters(self, first_name, last_name, world).await
    }

    async fn free_company(&self, id: &str) -> Result<FreeCompanyRecord, LodestoneError> {
        self.fetch_free_company(id).await
    }

    async fn free_company_members(&self, id: &str) -> Result<Vec<MemberRecord>, LodestoneError> {
        self.fetch_free_company_members(id).await
    }
}
