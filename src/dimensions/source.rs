//! Preset source: where the resolver gets its dimension table from.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::DimensionConfig;
use crate::dimensions::preset::{DimensionPresetTable, PresetRecord};

/// Supplies the dimension preset table.
pub trait PresetSource: Send + Sync {
    /// Snapshot of every configured dimension, in table order.
    fn all_presets(&self) -> Arc<DimensionPresetTable>;

    /// Look up one preset of `dimension` by uri segment.
    fn find_preset_by_uri_segment(&self, dimension: &str, uri_segment: &str) -> Option<PresetRecord> {
        let table = self.all_presets();
        DimensionPresetTable::find_preset_by_uri_segment(&table, dimension, uri_segment).cloned()
    }
}

/// Preset source backed by the loaded configuration.
///
/// The table can be replaced while requests are in flight; each caller keeps
/// the snapshot it started with.
#[derive(Debug)]
pub struct ConfiguredPresetSource {
    table: ArcSwap<DimensionPresetTable>,
}

impl ConfiguredPresetSource {
    pub fn new(table: DimensionPresetTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    pub fn from_config(dimensions: &[DimensionConfig]) -> Self {
        Self::new(DimensionPresetTable::from_config(dimensions))
    }

    /// Atomically install a new table.
    pub fn replace(&self, table: DimensionPresetTable) {
        tracing::info!(dimensions = table.len(), "Dimension presets replaced");
        self.table.store(Arc::new(table));
    }
}

impl Default for ConfiguredPresetSource {
    fn default() -> Self {
        Self::new(DimensionPresetTable::default())
    }
}

impl PresetSource for ConfiguredPresetSource {
    fn all_presets(&self) -> Arc<DimensionPresetTable> {
        self.table.load_full()
    }
}

/// A fixed table shared by reference; every snapshot is the same table.
impl PresetSource for Arc<DimensionPresetTable> {
    fn all_presets(&self) -> Arc<DimensionPresetTable> {
        Arc::clone(self)
    }
}
