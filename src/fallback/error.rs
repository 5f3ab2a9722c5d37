//! Fallback fetch errors.

use thiserror::Error;
use url::Url;

/// Failure below the HTTP layer (DNS, connect, timeout, body read).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors surfaced by the fallback content fetch.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// The fallback path itself answered 404.
    #[error("Uri with path \"{uri}\" could not be found")]
    NotFound { uri: Url },

    /// The internal request never produced a response.
    #[error("Fallback fetch of \"{uri}\" failed: {source}")]
    Transport {
        uri: Url,
        #[source]
        source: TransportError,
    },
}

impl FallbackError {
    /// The URI that was attempted.
    pub fn uri(&self) -> &Url {
        match self {
            FallbackError::NotFound { uri } | FallbackError::Transport { uri, .. } => uri,
        }
    }
}

/// Result type for fallback operations.
pub type FallbackResult<T> = Result<T, FallbackError>;
