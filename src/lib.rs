//! Localized not-found pages for dimension-routed content applications.
//!
//! Sits in front of a content application, forwards every request, and when
//! the application answers 404 fetches the localized fallback page
//! (e.g. `/de_fr/404`) from the same application.

pub mod config;
pub mod dimensions;
pub mod fallback;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::AppConfig;
pub use fallback::{FallbackError, PathLocalizer, RequestContext};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
