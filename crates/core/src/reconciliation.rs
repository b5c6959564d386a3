//! Result types for a Free Company roster reconciliation run.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::error::SyncError;
use crate::types::{LodestoneId, Snowflake};

/// Counts and affected owners produced by one reconciliation run.
///
/// `confirmed + created` equals the roster size for every run that
/// completes. Owners are kept ordered and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub free_company_id: LodestoneId,
    pub free_company_name: Option<String>,
    /// Roster members already stored locally (FC reconfirmed, name refreshed).
    pub confirmed: usize,
    /// Roster members discovered and created without an owner.
    pub created: usize,
    /// Local characters no longer on the roster whose FC was cleared.
    pub removed: usize,
    pub affected_owners: BTreeSet<Snowflake>,
}

impl ReconcileReport {
    pub fn new(free_company_id: LodestoneId) -> Self {
        Self {
            free_company_id,
            ..Self::default()
        }
    }

    /// Record an owner whose roles need re-evaluation. Ownerless rows are ignored.
    pub fn touch_owner(&mut self, owner_id: Option<Snowflake>) {
        if let Some(owner_id) = owner_id {
            self.affected_owners.insert(owner_id);
        }
    }
}

/// A reconciliation that stopped part-way.
///
/// `partial` holds only what was committed before `error`; nothing is
/// rolled back, and re-running converges.
#[derive(Debug, thiserror::Error)]
#[error(
    "Reconciliation of free company {} aborted after {} confirmed, {} created, {} removed: {error}",
    .partial.free_company_id, .partial.confirmed, .partial.created, .partial.removed
)]
pub struct ReconcileFailure {
    pub partial: ReconcileReport,
    #[source]
    pub error: SyncError,
}

/// Local ids that are not on the roster, preserving local order.
pub fn departed_members<'a>(
    local_ids: impl IntoIterator<Item = &'a LodestoneId>,
    roster: &HashSet<LodestoneId>,
) -> Vec<LodestoneId> {
    local_ids
        .into_iter()
        .filter(|id| !roster.contains(*id))
        .cloned()
        .collect()
}
