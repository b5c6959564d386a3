//! Discord REST implementation of [`RoleProvider`].
//!
//! Only the three guild-member endpoints role sync needs. Snowflakes travel
//! as JSON strings and are parsed into `i64`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tarubot_core::types::Snowflake;
use tarubot_sync::{GuildMember, RoleProvider, RoleProviderError};

/// HTTP client for the Discord guild member API.
#[derive(Clone)]
pub struct DiscordRoleProvider {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct MemberPayload {
    user: UserPayload,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
}

impl DiscordRoleProvider {
    /// * `api_url` - REST base, e.g. `https://discord.com/api/v10`.
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn member_url(&self, guild_id: Snowflake, user_id: Snowflake) -> String {
        format!("{}/guilds/{}/members/{}", self.api_url, guild_id, user_id)
    }

    fn role_url(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> String {
        format!("{}/roles/{}", self.member_url(guild_id, user_id), role_id)
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RoleProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RoleProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn request_err(err: reqwest::Error) -> RoleProviderError {
    if err.is_decode() {
        RoleProviderError::Malformed(err.to_string())
    } else {
        RoleProviderError::Request(err.to_string())
    }
}

fn parse_snowflake(raw: &str) -> Result<Snowflake, RoleProviderError> {
    raw.parse()
        .map_err(|_| RoleProviderError::Malformed(format!("invalid snowflake {raw:?}")))
}

#[async_trait]
impl RoleProvider for DiscordRoleProvider {
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<Option<GuildMember>, RoleProviderError> {
        let response = self
            .client
            .get(self.member_url(guild_id, user_id))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(request_err)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let payload: MemberPayload = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(request_err)?;

        let role_ids = payload
            .roles
            .iter()
            .map(|r| parse_snowflake(r))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(GuildMember {
            user_id: parse_snowflake(&payload.user.id)?,
            role_ids,
        }))
    }

    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<(), RoleProviderError> {
        tracing::debug!(guild_id, user_id, role_id, "Adding Discord role");
        let response = self
            .client
            .put(self.role_url(guild_id, user_id, role_id))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(request_err)?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<(), RoleProviderError> {
        tracing::debug!(guild_id, user_id, role_id, "Removing Discord role");
        let response = self
            .client
            .delete(self.role_url(guild_id, user_id, role_id))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(request_err)?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
