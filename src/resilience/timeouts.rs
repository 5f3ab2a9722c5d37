//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out upstream requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// An operation did not complete in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// Run `fut`, failing with [`TimeoutError`] after `duration`.
pub async fn with_timeout<F: Future>(duration: Duration, fut: F) -> Result<F::Output, TimeoutError> {
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| TimeoutError(duration))
}
