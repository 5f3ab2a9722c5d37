//! Path localization and fallback content fetch.
//!
//! # Responsibilities
//! - Skip requests issued by ourselves (loop guard)
//! - Prefix the candidate path with the request's dimension segments
//! - Fetch the resolved path from the request's own base URI
//! - Map 404 and transport failures to typed errors

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::config::AppConfig;
use crate::dimensions::PresetSource;
use crate::fallback::client::FetchClient;
use crate::fallback::context::RequestContext;
use crate::fallback::error::{FallbackError, FallbackResult};
use crate::observability::metrics;
use crate::routing::append_first_uri_part_if_valid_dimension;

/// Candidate path used when the caller gives none.
pub const DEFAULT_PATH: &str = "404";

/// Settings fixed for the lifetime of a localizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizerSettings {
    /// User-Agent prefix of our own internal requests.
    pub signature: String,
    pub support_empty_segments: bool,
}

impl LocalizerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            signature: config.fallback.signature.clone(),
            support_empty_segments: config.routing.support_empty_segment_for_dimensions,
        }
    }
}

/// Fetched fallback content, byte for byte as the upstream sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackContent {
    /// `Content-Type` of the fetched response, if it had one.
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FallbackContent {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Result of a successful [`PathLocalizer::resolve_and_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The request came from ourselves; nothing was fetched.
    Skipped,
    /// Content fetched from `uri`.
    Fetched { uri: Url, content: FallbackContent },
}

impl FetchOutcome {
    /// The content to insert into the page; empty when skipped.
    pub fn into_content(self) -> FallbackContent {
        match self {
            FetchOutcome::Skipped => FallbackContent::default(),
            FetchOutcome::Fetched { content, .. } => content,
        }
    }
}

/// Resolves fallback paths against the dimension presets and fetches them.
#[derive(Debug)]
pub struct PathLocalizer<S, C> {
    presets: Arc<S>,
    client: C,
    settings: LocalizerSettings,
}

impl<S: PresetSource, C: FetchClient> PathLocalizer<S, C> {
    pub fn new(presets: Arc<S>, client: C, settings: LocalizerSettings) -> Self {
        Self {
            presets,
            client,
            settings,
        }
    }

    pub fn settings(&self) -> &LocalizerSettings {
        &self.settings
    }

    /// True when the request was issued by our own fetch client.
    pub fn is_own_request(&self, ctx: &RequestContext) -> bool {
        ctx.user_agent
            .as_deref()
            .is_some_and(|ua| ua.starts_with(&self.settings.signature))
    }

    /// Resolve `candidate` against `request_path` using one preset snapshot.
    pub fn resolve_path(&self, request_path: &str, candidate: &str) -> String {
        let table = self.presets.all_presets();
        append_first_uri_part_if_valid_dimension(
            request_path,
            candidate,
            &table,
            self.settings.support_empty_segments,
        )
    }

    /// Guard, localize, fetch and interpret.
    pub async fn resolve_and_fetch(
        &self,
        ctx: &RequestContext,
        candidate: &str,
    ) -> FallbackResult<FetchOutcome> {
        if self.is_own_request(ctx) {
            tracing::debug!(path = %ctx.path, "Internal request, skipping fallback fetch");
            metrics::record_fallback("skipped", None);
            return Ok(FetchOutcome::Skipped);
        }

        let resolved = self.resolve_path(&ctx.path, candidate);
        let uri = ctx.uri_for(&resolved);
        let start = Instant::now();

        tracing::debug!(request_path = %ctx.path, uri = %uri, "Fetching fallback content");

        let response = match self.client.send_request(Method::GET, &uri).await {
            Ok(response) => response,
            Err(source) => {
                metrics::record_fallback("transport_error", Some(start));
                return Err(FallbackError::Transport { uri, source });
            }
        };

        if response.status == StatusCode::NOT_FOUND.as_u16() {
            metrics::record_fallback("not_found", Some(start));
            return Err(FallbackError::NotFound { uri });
        }

        metrics::record_fallback("fetched", Some(start));
        Ok(FetchOutcome::Fetched {
            uri,
            content: FallbackContent {
                content_type: response.content_type,
                body: response.body,
            },
        })
    }

    /// Fallback content for `path` (default `"404"`), empty for our own requests.
    pub async fn render(&self, ctx: &RequestContext, path: Option<&str>) -> FallbackResult<FallbackContent> {
        let outcome = self
            .resolve_and_fetch(ctx, path.unwrap_or(DEFAULT_PATH))
            .await?;
        Ok(outcome.into_content())
    }
}
