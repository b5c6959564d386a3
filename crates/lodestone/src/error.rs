use tarubot_core::error::SyncError;
use tarubot_core::types::LodestoneId;

/// Errors from the Lodestone client layer.
#[derive(Debug, thiserror::Error)]
pub enum LodestoneError {
    /// The requested character or Free Company does not exist.
    #[error("{entity} {id} not found on the Lodestone")]
    NotFound {
        entity: &'static str,
        id: LodestoneId,
    },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The proxy returned a non-2xx status other than 404.
    #[error("Lodestone API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body lacks a required field or is not valid JSON.
    #[error("Malformed {entity} payload: {detail}")]
    Malformed {
        entity: &'static str,
        detail: String,
    },
}

impl LodestoneError {
    pub(crate) fn missing(entity: &'static str, field: &str) -> Self {
        Self::Malformed {
            entity,
            detail: format!("missing {field}"),
        }
    }
}

impl From<LodestoneError> for SyncError {
    fn from(err: LodestoneError) -> Self {
        match err {
            LodestoneError::NotFound { entity, id } => SyncError::NotFound { entity, id },
            LodestoneError::Request(_) | LodestoneError::ApiError { .. } => {
                SyncError::Transport(err.to_string())
            }
            LodestoneError::Malformed { .. } => SyncError::Malformed(err.to_string()),
        }
    }
}
