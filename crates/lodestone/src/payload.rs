//! Raw Nodestone payloads and their normalization.
//!
//! Every field is optional at the serde level so that a missing field turns
//! into a named [`LodestoneError::Malformed`] instead of an opaque decode
//! error. Only `World` is defaulted; the Free Company embedded in a character
//! profile may legitimately be absent.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use tarubot_core::types::{canonical_lodestone_id, LodestoneId};

use crate::error::LodestoneError;
use crate::pagination::{Page, Pagination};
use crate::records::{
    CharacterRecord, FreeCompanyRecord, FreeCompanyRef, MemberRecord, SearchHit, UNKNOWN_WORLD,
};

const CHARACTER: &str = "character";
const FREE_COMPANY: &str = "free company";
const MEMBER: &str = "free company member";
const SEARCH_HIT: &str = "character search result";

/// Accepts `123`, `"123"`, `""` and `null`, normalizing to the canonical
/// decimal string form (`"007"` becomes `"7"`). Empty strings and `null` are
/// `None`; anything non-numeric is an error.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<LodestoneId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdInput {
        Number(u64),
        Text(String),
    }

    match Option::<IdInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdInput::Number(value)) => Ok(Some(value.to_string())),
        Some(IdInput::Text(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            canonical_lodestone_id(raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid Lodestone id {raw:?}")))
        }
    }
}

/// A zero id is the proxy's way of saying "none".
fn is_zero(id: &str) -> bool {
    id == "0"
}

fn world_or_default(world: Option<String>) -> String {
    world
        .filter(|w| !w.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_WORLD.to_string())
}

/// `GET character/{id}`
#[derive(Debug, Deserialize)]
pub struct CharacterResponse {
    #[serde(rename = "Character", default)]
    pub character: Option<RawCharacter>,
}

#[derive(Debug, Deserialize)]
pub struct RawCharacter {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: Option<LodestoneId>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "World", default)]
    pub world: Option<String>,
    #[serde(rename = "FreeCompany", default)]
    pub free_company: Option<RawFreeCompanyRef>,
}

#[derive(Debug, Deserialize)]
pub struct RawFreeCompanyRef {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: Option<LodestoneId>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

impl CharacterResponse {
    /// `requested` is the id that was asked for; it labels `NotFound`.
    pub fn into_record(self, requested: &str) -> Result<CharacterRecord, LodestoneError> {
        let raw = self.character.ok_or_else(|| LodestoneError::NotFound {
            entity: CHARACTER,
            id: requested.to_string(),
        })?;

        let id = raw.id.ok_or_else(|| LodestoneError::missing(CHARACTER, "ID"))?;
        let name = raw.name.ok_or_else(|| LodestoneError::missing(CHARACTER, "Name"))?;

        // A zero or missing FC id means "not in a Free Company".
        let free_company = raw.free_company.and_then(|fc| match fc.id {
            Some(fc_id) if !is_zero(&fc_id) => Some(FreeCompanyRef {
                id: fc_id,
                name: fc.name.filter(|n| !n.trim().is_empty()),
            }),
            _ => None,
        });

        Ok(CharacterRecord {
            id,
            name,
            world: world_or_default(raw.world),
            free_company,
        })
    }
}

/// `GET freecompany/{id}`
#[derive(Debug, Deserialize)]
pub struct FreeCompanyResponse {
    #[serde(rename = "FreeCompany", default)]
    pub free_company: Option<RawFreeCompany>,
}

#[derive(Debug, Deserialize)]
pub struct RawFreeCompany {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: Option<LodestoneId>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "World", default)]
    pub world: Option<String>,
}

impl FreeCompanyResponse {
    pub fn into_record(self, requested: &str) -> Result<FreeCompanyRecord, LodestoneError> {
        let raw = self.free_company.ok_or_else(|| LodestoneError::NotFound {
            entity: FREE_COMPANY,
            id: requested.to_string(),
        })?;

        Ok(FreeCompanyRecord {
            // Some proxies omit the id on the profile itself.
            id: raw.id.unwrap_or_else(|| requested.to_string()),
            name: raw
                .name
                .ok_or_else(|| LodestoneError::missing(FREE_COMPANY, "Name"))?,
            world: world_or_default(raw.world),
        })
    }
}

/// A list entry shared by the member roster and the character search.
#[derive(Debug, Deserialize)]
pub struct RawListEntry {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: Option<LodestoneId>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "World", default)]
    pub world: Option<String>,
}

impl RawListEntry {
    fn normalize(
        self,
        entity: &'static str,
    ) -> Result<(LodestoneId, String, String), LodestoneError> {
        let id = self.id.ok_or_else(|| LodestoneError::missing(entity, "ID"))?;
        let name = self.name.ok_or_else(|| LodestoneError::missing(entity, "Name"))?;
        Ok((id, name, world_or_default(self.world)))
    }
}

/// `GET freecompany/{id}?data=FCM&page=N`
#[derive(Debug, Deserialize)]
pub struct MembersResponse {
    #[serde(rename = "FreeCompanyMembers", default)]
    pub members: Option<RawMemberList>,
    #[serde(rename = "Pagination", default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct RawMemberList {
    #[serde(rename = "List", default)]
    pub list: Option<Vec<RawListEntry>>,
}

impl MembersResponse {
    pub fn into_page(self) -> Result<Page<MemberRecord>, LodestoneError> {
        let members = self
            .members
            .ok_or_else(|| LodestoneError::missing(MEMBER, "FreeCompanyMembers"))?;

        let Some(list) = members.list else {
            return Ok(Page::last(Vec::new()));
        };

        let items = list
            .into_iter()
            .map(|entry| {
                entry
                    .normalize(MEMBER)
                    .map(|(id, name, world)| MemberRecord { id, name, world })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            pagination: self.pagination,
        })
    }
}

/// `GET character/search?name=..&server=..&page=N`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "List", default)]
    pub list: Option<Vec<RawListEntry>>,
    #[serde(rename = "Pagination", default)]
    pub pagination: Option<Pagination>,
}

impl SearchResponse {
    pub fn into_page(self) -> Result<Page<SearchHit>, LodestoneError> {
        let Some(list) = self.list else {
            return Ok(Page::last(Vec::new()));
        };

        let items = list
            .into_iter()
            .map(|entry| {
                entry
                    .normalize(SEARCH_HIT)
                    .map(|(id, name, world)| SearchHit { id, name, world })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            pagination: self.pagination,
        })
    }
}

/// Decode a response body, reporting failures as `Malformed`.
pub fn decode<T: serde::de::DeserializeOwned>(
    body: &str,
    entity: &'static str,
) -> Result<T, LodestoneError> {
    serde_json::from_str(body).map_err(|e| LodestoneError::Malformed {
        entity,
        detail: e.to_string(),
    })
}
