//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → dimension presets handed to the preset source
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → preset table swapped atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the preset table is hot-swapped
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::DimensionConfig;
pub use schema::FallbackConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::PresetConfig;
pub use schema::RoutingConfig;
pub use schema::UpstreamConfig;
