//! Dimension segment resolution for fallback paths.
//!
//! Decides whether the candidate path gets the request's own dimension
//! prefix, the default prefix, or none at all.

use crate::dimensions::DimensionPresetTable;
use crate::routing::matcher::{DimensionRequestPath, SEGMENT_DELIMITER};

/// Prefix `candidate` with the dimension segments of `request_path`.
///
/// With `support_empty_segments`, every token only has to be a known uri
/// segment of some dimension; an unknown token leaves the candidate
/// untouched. Without it, tokens are matched positionally, one per
/// dimension, and any mismatch substitutes the default segments.
pub fn append_first_uri_part_if_valid_dimension(
    request_path: &str,
    candidate: &str,
    table: &DimensionPresetTable,
    support_empty_segments: bool,
) -> String {
    let Some(matched) = DimensionRequestPath::parse(request_path) else {
        return candidate.to_string();
    };

    if table.is_empty() {
        return candidate.to_string();
    }

    let segments: Vec<&str> = matched.segments().collect();

    if support_empty_segments {
        let all_known = segments.iter().all(|segment| {
            table
                .iter()
                .any(|dimension| dimension.find_by_uri_segment(segment).is_some())
        });
        // No default substitution on this branch.
        if !all_known {
            return candidate.to_string();
        }
    } else {
        if segments.len() != table.len() {
            return prefixed(&default_dimension_uri_segments(table), candidate);
        }

        let positional_match = table
            .iter()
            .zip(&segments)
            .all(|(dimension, segment)| dimension.find_by_uri_segment(segment).is_some());
        if !positional_match {
            return prefixed(&default_dimension_uri_segments(table), candidate);
        }
    }

    prefixed(matched.first_uri_part(), candidate)
}

/// The default preset uri segment of every dimension, joined by `_`.
///
/// A dimension whose default preset id does not resolve contributes an
/// empty segment.
pub fn default_dimension_uri_segments(table: &DimensionPresetTable) -> String {
    let segments: Vec<&str> = table
        .iter()
        .map(|dimension| match dimension.default_preset() {
            Some(preset) => preset.uri_segment.as_str(),
            None => {
                tracing::warn!(
                    dimension = %dimension.name,
                    default_preset = %dimension.default_preset_id,
                    "Default preset not found, using empty uri segment"
                );
                ""
            }
        })
        .collect();

    segments.join(SEGMENT_DELIMITER)
}

fn prefixed(prefix: &str, candidate: &str) -> String {
    format!("{prefix}/{candidate}")
}
