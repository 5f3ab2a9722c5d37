//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default presets exist)
//! - Validate value ranges (timeouts > 0, URLs absolute)
//! - Detect conflicting uri segments within a dimension
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("dimension #{index} has an empty name")]
    EmptyDimensionName { index: usize },

    #[error("dimension '{0}' is defined more than once")]
    DuplicateDimension(String),

    #[error("dimension '{0}' has no presets")]
    NoPresets(String),

    #[error("dimension '{dimension}' default preset '{preset}' does not exist")]
    UnknownDefaultPreset { dimension: String, preset: String },

    #[error("dimension '{dimension}' uses uri segment '{segment}' for more than one preset")]
    DuplicateUriSegment { dimension: String, segment: String },

    #[error("dimension '{dimension}' preset '{preset}' uri segment '{segment}' contains a reserved character")]
    ReservedCharacter {
        dimension: String,
        preset: String,
        segment: String,
    },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("fallback.base_uri '{0}' is not an absolute http(s) URL")]
    InvalidBaseUri(String),

    #[error("fallback.public_scheme '{0}' must be http or https")]
    InvalidScheme(String),

    #[error("fallback.allowed_hosts entry '{0}' is not a host or host:port")]
    InvalidAllowedHost(String),
}

const RESERVED_SEGMENT_CHARS: [char; 3] = ['/', '_', '@'];

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_dimensions(config, &mut errors);

    let fallback = &config.fallback;
    if fallback.path.is_empty() {
        errors.push(ValidationError::Empty { field: "fallback.path" });
    }
    if fallback.signature.is_empty() {
        errors.push(ValidationError::Empty { field: "fallback.signature" });
    }
    if fallback.timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "fallback.timeout_secs" });
    }
    if !matches!(fallback.public_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::InvalidScheme(fallback.public_scheme.clone()));
    }
    if let Some(base) = &fallback.base_uri {
        let valid = Url::parse(base)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidBaseUri(base.clone()));
        }
    }
    for host in &fallback.allowed_hosts {
        if !is_host_authority(host) {
            errors.push(ValidationError::InvalidAllowedHost(host.clone()));
        }
    }

    if config.upstream.address.is_empty() {
        errors.push(ValidationError::Empty { field: "upstream.address" });
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "upstream.connect_timeout_secs" });
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "upstream.request_timeout_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host` or `host:port` with nothing else (no scheme, path or userinfo).
fn is_host_authority(value: &str) -> bool {
    if value.is_empty() || value.contains(['/', '@', '?', '#']) {
        return false;
    }
    Url::parse(&format!("http://{value}/"))
        .map(|url| url.has_host())
        .unwrap_or(false)
}

fn validate_dimensions(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let mut names = HashSet::new();

    for (index, dimension) in config.dimensions.iter().enumerate() {
        if dimension.name.is_empty() {
            errors.push(ValidationError::EmptyDimensionName { index });
        } else if !names.insert(dimension.name.as_str()) {
            errors.push(ValidationError::DuplicateDimension(dimension.name.clone()));
        }

        if dimension.presets.is_empty() {
            errors.push(ValidationError::NoPresets(dimension.name.clone()));
            continue;
        }

        if !dimension.presets.contains_key(&dimension.default_preset) {
            errors.push(ValidationError::UnknownDefaultPreset {
                dimension: dimension.name.clone(),
                preset: dimension.default_preset.clone(),
            });
        }

        let mut segments = HashSet::new();
        for (preset_id, preset) in &dimension.presets {
            if preset.uri_segment.contains(RESERVED_SEGMENT_CHARS) {
                errors.push(ValidationError::ReservedCharacter {
                    dimension: dimension.name.clone(),
                    preset: preset_id.clone(),
                    segment: preset.uri_segment.clone(),
                });
            }
            if !segments.insert(preset.uri_segment.as_str()) {
                errors.push(ValidationError::DuplicateUriSegment {
                    dimension: dimension.name.clone(),
                    segment: preset.uri_segment.clone(),
                });
            }
        }
    }
}
