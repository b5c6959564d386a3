use crate::types::LodestoneId;

/// Failure taxonomy shared by the sync engine, the cache, and the stores.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The root entity does not exist on the external source.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound {
        entity: &'static str,
        id: LodestoneId,
    },

    /// Network failure or non-2xx response from the external source.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A successful response was missing a required field.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// A persistence operation failed.
    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl SyncError {
    /// Whether this error means the external entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
