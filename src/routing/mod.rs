//! Dimension-aware path routing.
//!
//! # Data Flow
//! ```text
//! Request path ("/de_fr/about")
//!     → matcher.rs (capture first uri part: "de_fr")
//!     → segments.rs (validate tokens against the preset table)
//!     → Return: candidate path, prefixed or unchanged
//! ```
//!
//! # Design Decisions
//! - No regex: the first uri part is captured by a single scan
//! - Pure functions over a table snapshot; nothing is cached
//! - Deterministic: same input and table always give the same path

pub mod matcher;
pub mod segments;

pub use matcher::DimensionRequestPath;
pub use segments::{append_first_uri_part_if_valid_dimension, default_dimension_uri_segments};
