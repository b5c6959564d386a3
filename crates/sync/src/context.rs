use std::sync::Arc;

use tarubot_core::clock::Clock;
use tarubot_lodestone::LodestoneSource;

use crate::roles::RoleProvider;
use crate::store::LocalStore;

/// Handles every sync operation runs against.
///
/// Cheaply cloneable; holds no locks and no mutable state of its own.
#[derive(Clone)]
pub struct SyncContext {
    pub store: Arc<dyn LocalStore>,
    pub source: Arc<dyn LodestoneSource>,
    pub roles: Arc<dyn RoleProvider>,
    pub clock: Arc<dyn Clock>,
}

impl SyncContext {
    pub fn new(
        store: Arc<dyn LocalStore>,
        source: Arc<dyn LodestoneSource>,
        roles: Arc<dyn RoleProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            source,
            roles,
            clock,
        }
    }
}
