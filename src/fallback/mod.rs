//! Not-found fallback content.
//!
//! # Data Flow
//! ```text
//! RequestContext (path, User-Agent, base URI) + candidate path ("404")
//!     → localizer.rs: loop guard (own User-Agent → empty result)
//!     → routing::segments (dimension prefix)
//!     → client.rs (internal GET of base URI + resolved path)
//!     → 404 → FallbackError::NotFound
//!     → transport failure → FallbackError::Transport
//!     → anything else → raw body + content type
//! ```
//!
//! # Design Decisions
//! - Collaborators are explicit: preset source and fetch client are owned,
//!   the request context is passed per call
//! - No retries; every failure surfaces to the caller
//! - No state survives a call

pub mod client;
pub mod context;
pub mod error;
pub mod localizer;

pub use client::{user_agent, FetchClient, FetchResponse, HttpFetchClient};
pub use context::RequestContext;
pub use error::{FallbackError, TransportError};
pub use localizer::{FallbackContent, FetchOutcome, LocalizerSettings, PathLocalizer, DEFAULT_PATH};
