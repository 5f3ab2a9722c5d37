//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The content application requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Dimension routing options.
    pub routing: RoutingConfig,

    /// Not-found fallback content settings.
    pub fallback: FallbackConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Content dimensions, in table order.
    pub dimensions: Vec<DimensionConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream content application.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total time allowed for an upstream request/response in seconds.
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Dimension routing options.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutingConfig {
    /// Accept any combination of known uri segments instead of requiring
    /// exactly one segment per dimension.
    pub support_empty_segment_for_dimensions: bool,
}

/// Fallback content fetch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Replace upstream 404 bodies with fetched fallback content.
    pub enabled: bool,

    /// Logical path of the fallback content.
    pub path: String,

    /// User-Agent prefix identifying our own internal requests.
    pub signature: String,

    /// Scheme used when the base URI is derived from the Host header.
    pub public_scheme: String,

    /// Fixed base URI for fallback fetches. Derived per request when unset.
    pub base_uri: Option<String>,

    /// `Host` header values (`host` or `host:port`) trusted as a fetch base.
    /// Requests naming any other host fetch from the upstream directly.
    pub allowed_hosts: Vec<String>,

    /// Fetch timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "404".to_string(),
            signature: "NotFoundPages".to_string(),
            public_scheme: "http".to_string(),
            base_uri: None,
            allowed_hosts: Vec::new(),
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One content dimension (e.g. language).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DimensionConfig {
    /// Dimension name, unique across the table.
    pub name: String,

    /// Preset id used when no valid segment is supplied.
    pub default_preset: String,

    /// Presets keyed by preset id.
    #[serde(default)]
    pub presets: BTreeMap<String, PresetConfig>,
}

/// One allowed value of a dimension.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresetConfig {
    /// Segment used in URLs; may be empty.
    pub uri_segment: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub values: Vec<String>,

    /// Any other keys are kept as opaque metadata.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, toml::Value>,
}
