//! REST client for a Nodestone-compatible Lodestone proxy.
//!
//! Wraps the four read-only endpoints the bot needs using [`reqwest`].
//! Listing endpoints are aggregated across all pages before returning.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::LodestoneError;
use crate::pagination::{collect_pages, Page};
use crate::payload::{
    self, CharacterResponse, FreeCompanyResponse, MembersResponse, SearchResponse,
};
use crate::records::{CharacterRecord, FreeCompanyRecord, MemberRecord, SearchHit};

/// HTTP client for a single Lodestone proxy.
#[derive(Clone)]
pub struct LodestoneApi {
    client: reqwest::Client,
    base_url: String,
}

impl LodestoneApi {
    /// Create a client for the proxy at `base_url`, e.g. `http://nodestone:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`], typically one
    /// built with a request timeout.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /character/{id}`
    pub async fn fetch_character(&self, id: &str) -> Result<CharacterRecord, LodestoneError> {
        tracing::debug!(character_id = %id, "Fetching character from Lodestone");

        let url = format!("{}/character/{}", self.base_url, id);
        let response: CharacterResponse = self.get_json(&url, &[], "character", id).await?;
        response.into_record(id)
    }

    /// `GET /freecompany/{id}`
    pub async fn fetch_free_company(&self, id: &str) -> Result<FreeCompanyRecord, LodestoneError> {
        tracing::debug!(fc_id = %id, "Fetching free company from Lodestone");

        let url = format!("{}/freecompany/{}", self.base_url, id);
        let response: FreeCompanyResponse = self.get_json(&url, &[], "free company", id).await?;
        response.into_record(id)
    }

    /// Full member roster of a Free Company, every page aggregated.
    pub async fn fetch_free_company_members(
        &self,
        id: &str,
    ) -> Result<Vec<MemberRecord>, LodestoneError> {
        let url = format!("{}/freecompany/{}", self.base_url, id);

        let members = collect_pages(|page| {
            let url = url.clone();
            async move { self.fetch_members_page(&url, id, page).await }
        })
        .await?;

        tracing::debug!(fc_id = %id, members = members.len(), "Fetched free company roster");
        Ok(members)
    }

    /// Search characters by full name on a world, every page aggregated.
    ///
    /// A 404 on the first page means "no results"; on any later page it is
    /// propagated like every other failure.
    pub async fn search_characters(
        &self,
        first_name: &str,
        last_name: &str,
        world: &str,
    ) -> Result<Vec<SearchHit>, LodestoneError> {
        let url = format!("{}/character/search", self.base_url);
        let name = format!("{} {}", first_name.trim(), last_name.trim());

        let hits = collect_pages(|page| {
            let url = url.clone();
            let name = name.clone();
            async move { self.fetch_search_page(&url, &name, world, page).await }
        })
        .await?;

        tracing::debug!(%name, %world, hits = hits.len(), "Character search finished");
        Ok(hits)
    }

    // ---- private helpers ----

    async fn fetch_members_page(
        &self,
        url: &str,
        id: &str,
        page: u32,
    ) -> Result<Page<MemberRecord>, LodestoneError> {
        tracing::debug!(fc_id = %id, page, "Fetching free company members page");

        let page_param = page.to_string();
        let response: MembersResponse = self
            .get_json(
                url,
                &[("data", "FCM"), ("page", page_param.as_str())],
                "free company",
                id,
            )
            .await?;
        response.into_page()
    }

    async fn fetch_search_page(
        &self,
        url: &str,
        name: &str,
        world: &str,
        page: u32,
    ) -> Result<Page<SearchHit>, LodestoneError> {
        tracing::debug!(%name, %world, page, "Fetching character search page");

        let page_param = page.to_string();
        let response = self
            .get_json::<SearchResponse>(
                url,
                &[("name", name), ("server", world), ("page", page_param.as_str())],
                "character search",
                name,
            )
            .await;

        match response {
            Ok(response) => response.into_page(),
            Err(LodestoneError::NotFound { .. }) if page == 1 => Ok(Page::last(Vec::new())),
            Err(e) => Err(e),
        }
    }

    /// Issue a GET and decode the body. 404 becomes `NotFound` labelled with
    /// `entity`/`id`; any other non-2xx becomes `ApiError`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        entity: &'static str,
        id: &str,
    ) -> Result<T, LodestoneError> {
        let response = self.client.get(url).query(query).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LodestoneError::NotFound {
                entity,
                id: id.to_string(),
            });
        }

        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        payload::decode(&body, entity)
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`LodestoneError::ApiError`] containing the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, LodestoneError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LodestoneError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
