//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Extract the fallback RequestContext (path, User-Agent, base URI)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A configured base URI wins over the Host header
//! - A Host header is only trusted when listed in `fallback.allowed_hosts`;
//!   otherwise the fallback is fetched from the upstream directly

use axum::body::Body;
use axum::http::header::{HOST, USER_AGENT};
use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;
use uuid::Uuid;

use crate::config::{FallbackConfig, UpstreamConfig};
use crate::fallback::RequestContext;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 request ID when the client sent none.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID of `request`, or `"unknown"`.
pub fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Build the fallback context for an inbound request.
///
/// The base URI is `config.base_uri` when set, the scheme and `Host` of the
/// request when that host is allowed, and `upstream_base` otherwise.
pub fn request_context(
    request: &Request<Body>,
    config: &FallbackConfig,
    upstream_base: &Url,
) -> RequestContext {
    let base_uri = configured_base(config)
        .or_else(|| allowed_host_base(request, config))
        .unwrap_or_else(|| upstream_base.clone());

    let mut ctx = RequestContext::new(request.uri().path(), base_uri);
    ctx.user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    ctx
}

/// `http://<address>/` for the upstream content application.
pub fn upstream_base(upstream: &UpstreamConfig) -> Result<Url, url::ParseError> {
    Url::parse(&format!("http://{}/", upstream.address))
}

fn configured_base(config: &FallbackConfig) -> Option<Url> {
    Url::parse(config.base_uri.as_deref()?).ok()
}

fn allowed_host_base(request: &Request<Body>, config: &FallbackConfig) -> Option<Url> {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))?;

    let allowed = config
        .allowed_hosts
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&host));
    if !allowed {
        tracing::debug!(host = %host, "Host not in fallback.allowed_hosts, using upstream base");
        return None;
    }

    Url::parse(&format!("{}://{}/", config.public_scheme, host)).ok()
}
