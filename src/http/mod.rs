//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → forward to upstream content application
//!     → upstream 404 on GET?
//!         → request.rs (RequestContext from inbound request)
//!         → fallback::PathLocalizer::render
//!         → response.rs (404 page with fetched bytes and content type)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_context, upstream_base, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
