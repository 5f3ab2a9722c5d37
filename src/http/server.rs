//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (tracing, request ID)
//! - Forward requests to the upstream content application
//! - Replace upstream 404 bodies with localized fallback content
//! - Apply configuration reloads to the preset table

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, Uri, Version},
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use url::Url;

use crate::config::{AppConfig, FallbackConfig, UpstreamConfig};
use crate::dimensions::{ConfiguredPresetSource, DimensionPresetTable};
use crate::fallback::{
    FallbackError, HttpFetchClient, LocalizerSettings, PathLocalizer, RequestContext,
    TransportError,
};
use crate::http::request::{request_context, request_id, upstream_base, MakeRequestUuidV4};
use crate::http::response;
use crate::lifecycle::shutdown::signalled;
use crate::observability::metrics;
use crate::resilience::with_timeout;

/// The localizer wired to the configured presets and the reqwest client.
pub type Localizer = PathLocalizer<ConfiguredPresetSource, HttpFetchClient>;

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build fallback client: {0}")]
    FallbackClient(#[from] TransportError),

    #[error("upstream address '{address}' is not a valid authority: {source}")]
    UpstreamAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub localizer: Arc<Localizer>,
    pub client: Client<HttpConnector, Body>,
    pub upstream: UpstreamConfig,
    /// Fallback fetch base when the request's host is not trusted.
    pub upstream_base: Url,
    pub fallback: FallbackConfig,
}

/// Forwarding server with not-found fallback.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    presets: Arc<ConfiguredPresetSource>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let upstream_base =
            upstream_base(&config.upstream).map_err(|source| ServerError::UpstreamAddress {
                address: config.upstream.address.clone(),
                source,
            })?;

        let presets = Arc::new(ConfiguredPresetSource::from_config(&config.dimensions));
        let localizer = Arc::new(PathLocalizer::new(
            presets.clone(),
            HttpFetchClient::new(&config.fallback)?,
            LocalizerSettings::from_config(&config),
        ));

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(
            config.upstream.connect_timeout_secs,
        )));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            localizer,
            client,
            upstream: config.upstream.clone(),
            upstream_base,
            fallback: config.fallback.clone(),
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            presets,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the preset table.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            dimensions = self.config.dimensions.len(),
            "HTTP server starting"
        );

        tokio::spawn(apply_config_updates(
            self.presets.clone(),
            config_updates,
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The preset source shared with the localizer.
    pub fn presets(&self) -> Arc<ConfiguredPresetSource> {
        self.presets.clone()
    }
}

async fn apply_config_updates(
    presets: Arc<ConfiguredPresetSource>,
    mut updates: mpsc::UnboundedReceiver<AppConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(config) => {
                    presets.replace(DimensionPresetTable::from_config(&config.dimensions));
                }
                None => break,
            },
            _ = shutdown.recv() => break,
        }
    }
}

/// Forwards the request upstream and substitutes fallback content on 404.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();

    let fallback_ctx = if state.fallback.enabled && method == Method::GET {
        Some(request_context(&request, &state.fallback, &state.upstream_base))
    } else {
        None
    };

    let (mut parts, body) = request.into_parts();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %parts.uri.path(),
        "Forwarding request"
    );

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let uri = match Uri::builder()
        .scheme("http")
        .authority(state.upstream.address.as_str())
        .path_and_query(path_and_query)
        .build()
    {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Invalid upstream URI");
            return response::bad_gateway();
        }
    };
    parts.uri = uri;
    parts.version = Version::HTTP_11;

    let upstream_timeout = Duration::from_secs(state.upstream.request_timeout_secs);
    let result = with_timeout(
        upstream_timeout,
        state.client.request(Request::from_parts(parts, body)),
    )
    .await;

    let upstream_response = match result {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_request(method.as_str(), 502, start_time);
            return response::bad_gateway();
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream timeout");
            metrics::record_request(method.as_str(), 504, start_time);
            return response::gateway_timeout();
        }
    };

    let status = upstream_response.status();
    metrics::record_request(method.as_str(), status.as_u16(), start_time);

    if status == StatusCode::NOT_FOUND {
        if let Some(ctx) = fallback_ctx {
            if let Some(page) = render_fallback(&state, &ctx, &request_id).await {
                return page;
            }
        }
    }

    let (parts, body) = upstream_response.into_parts();
    Response::from_parts(parts, Body::new(body))
}

/// Fallback page for `ctx`, or `None` to pass the upstream 404 through.
async fn render_fallback(state: &AppState, ctx: &RequestContext, request_id: &str) -> Option<Response> {
    match state.localizer.render(ctx, Some(state.fallback.path.as_str())).await {
        Ok(content) if content.is_empty() => None,
        Ok(content) => Some(response::fallback_page(content)),
        Err(e @ FallbackError::NotFound { .. }) => {
            tracing::debug!(request_id = %request_id, error = %e, "No fallback content");
            None
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Fallback fetch failed");
            None
        }
    }
}
