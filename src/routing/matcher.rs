//! Request path matching.
//!
//! # Responsibilities
//! - Strip the leading slash of the request path
//! - Capture the first uri part (dimension segments joined by `_`)
//! - Expose the remaining request path
//!
//! # Design Decisions
//! - The first uri part stops at the first `/` or `@`
//! - An empty first uri part is no match
//! - Path matching is case-sensitive

/// Separator between the uri segments of different dimensions.
pub const SEGMENT_DELIMITER: &str = "_";

const PART_TERMINATORS: [char; 2] = ['/', '@'];

/// A request path that starts with a candidate dimension prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionRequestPath<'a> {
    first_uri_part: &'a str,
    remaining: &'a str,
}

impl<'a> DimensionRequestPath<'a> {
    /// Capture the first uri part of `request_path`.
    ///
    /// Returns `None` when the path carries nothing that could encode
    /// dimension segments (e.g. `/` or `/@user`).
    pub fn parse(request_path: &'a str) -> Option<Self> {
        let path = request_path.strip_prefix('/').unwrap_or(request_path);
        let end = path.find(PART_TERMINATORS).unwrap_or(path.len());
        if end == 0 {
            return None;
        }

        let (first_uri_part, rest) = path.split_at(end);
        Some(Self {
            first_uri_part,
            remaining: rest.strip_prefix('/').unwrap_or(rest),
        })
    }

    /// The captured prefix, verbatim.
    pub fn first_uri_part(&self) -> &'a str {
        self.first_uri_part
    }

    /// Everything after the first uri part and its slash.
    pub fn remaining(&self) -> &'a str {
        self.remaining
    }

    /// Raw tokens of the first uri part, split on `_`. Tokens may be empty.
    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.first_uri_part.split(SEGMENT_DELIMITER)
    }
}
