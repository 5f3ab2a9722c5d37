//! Dimension preset data model.

use std::collections::BTreeMap;

use crate::config::schema::{DimensionConfig, PresetConfig};

/// One allowed value of a dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetRecord {
    /// Segment used in URLs; may be empty.
    pub uri_segment: String,
    pub label: Option<String>,
    pub values: Vec<String>,
    /// Opaque extra keys from the configuration.
    pub metadata: BTreeMap<String, toml::Value>,
}

impl PresetRecord {
    /// A record carrying only a uri segment.
    pub fn new(uri_segment: impl Into<String>) -> Self {
        Self {
            uri_segment: uri_segment.into(),
            label: None,
            values: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }
}

impl From<&PresetConfig> for PresetRecord {
    fn from(config: &PresetConfig) -> Self {
        Self {
            uri_segment: config.uri_segment.clone(),
            label: config.label.clone(),
            values: config.values.clone(),
            metadata: config.metadata.clone(),
        }
    }
}

/// A configurable content axis such as language or market.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionPreset {
    pub name: String,
    pub default_preset_id: String,
    /// Presets keyed by preset id.
    pub presets: BTreeMap<String, PresetRecord>,
}

impl DimensionPreset {
    /// Create a dimension with no presets.
    pub fn new(name: impl Into<String>, default_preset_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_preset_id: default_preset_id.into(),
            presets: BTreeMap::new(),
        }
    }

    /// Builder-style preset registration.
    pub fn with_preset(mut self, id: impl Into<String>, record: PresetRecord) -> Self {
        self.presets.insert(id.into(), record);
        self
    }

    /// Find the preset whose uri segment equals `uri_segment`.
    pub fn find_by_uri_segment(&self, uri_segment: &str) -> Option<&PresetRecord> {
        self.presets
            .values()
            .find(|preset| preset.uri_segment == uri_segment)
    }

    /// The default preset record, if the default id resolves.
    pub fn default_preset(&self) -> Option<&PresetRecord> {
        self.presets.get(&self.default_preset_id)
    }
}

impl From<&DimensionConfig> for DimensionPreset {
    fn from(config: &DimensionConfig) -> Self {
        Self {
            name: config.name.clone(),
            default_preset_id: config.default_preset.clone(),
            presets: config
                .presets
                .iter()
                .map(|(id, preset)| (id.clone(), PresetRecord::from(preset)))
                .collect(),
        }
    }
}

/// Ordered mapping from dimension name to its presets.
///
/// Insertion order determines which dimension a positional uri segment is
/// checked against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionPresetTable {
    dimensions: Vec<DimensionPreset>,
}

impl DimensionPresetTable {
    pub fn new(dimensions: Vec<DimensionPreset>) -> Self {
        Self { dimensions }
    }

    /// Build a table from the `[[dimensions]]` configuration, keeping order.
    pub fn from_config(dimensions: &[DimensionConfig]) -> Self {
        Self::new(dimensions.iter().map(DimensionPreset::from).collect())
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Dimensions in table order.
    pub fn iter(&self) -> impl Iterator<Item = &DimensionPreset> {
        self.dimensions.iter()
    }

    pub fn get(&self, dimension: &str) -> Option<&DimensionPreset> {
        self.dimensions.iter().find(|d| d.name == dimension)
    }

    /// Look up a preset of `dimension` by its uri segment.
    pub fn find_preset_by_uri_segment(
        &self,
        dimension: &str,
        uri_segment: &str,
    ) -> Option<&PresetRecord> {
        self.get(dimension)?.find_by_uri_segment(uri_segment)
    }

    /// Uri segment of the default preset of `dimension`.
    pub fn default_uri_segment(&self, dimension: &str) -> Option<&str> {
        self.get(dimension)?
            .default_preset()
            .map(|preset| preset.uri_segment.as_str())
    }
}
