//! Canonical records produced by the client.

use serde::Serialize;
use tarubot_core::types::LodestoneId;

/// World name used when the payload omits one.
pub const UNKNOWN_WORLD: &str = "Unknown World";

/// A character profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRecord {
    pub id: LodestoneId,
    pub name: String,
    pub world: String,
    /// `None` when the character is not in a Free Company.
    pub free_company: Option<FreeCompanyRef>,
}

impl CharacterRecord {
    pub fn free_company_id(&self) -> Option<&str> {
        self.free_company.as_ref().map(|fc| fc.id.as_str())
    }
}

/// The Free Company summary embedded in a character profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeCompanyRef {
    pub id: LodestoneId,
    pub name: Option<String>,
}

/// A Free Company profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeCompanyRecord {
    pub id: LodestoneId,
    pub name: String,
    pub world: String,
}

/// One entry of a Free Company member roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    pub id: LodestoneId,
    pub name: String,
    pub world: String,
}

/// One character search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: LodestoneId,
    pub name: String,
    pub world: String,
}
