//! Content dimension presets.
//!
//! # Data Flow
//! ```text
//! [[dimensions]] config
//!     → preset.rs (DimensionPresetTable, ordered)
//!     → source.rs (ConfiguredPresetSource, atomically swappable)
//!     → snapshot (Arc) per resolution call
//! ```
//!
//! # Design Decisions
//! - Table order is config order; positional matching depends on it
//! - A resolution call reads one snapshot and never mutates it
//! - Reloads replace the whole table, never individual presets

pub mod preset;
pub mod source;

pub use preset::{DimensionPreset, DimensionPresetTable, PresetRecord};
pub use source::{ConfiguredPresetSource, PresetSource};
