// gaugedash-core/src/options.rs
use serde::{Deserialize, Serialize};

use crate::threshold::Thresholds;

/// Gauge panel options, the object the threshold editor reports back to its host
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    pub min_value: f64,
    pub max_value: f64,
    pub prefix: String,
    pub suffix: String,
    pub unit: String,
    pub decimals: u8,
    pub show_threshold_labels: bool,
    pub show_threshold_markers: bool,
    pub thresholds: Thresholds,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 100.0,
            prefix: String::new(),
            suffix: String::new(),
            unit: String::new(),
            decimals: 0,
            show_threshold_labels: false,
            show_threshold_markers: true,
            thresholds: Thresholds::default(),
        }
    }
}

impl PanelOptions {
    /// Same options with a different threshold list
    pub fn with_thresholds(&self, thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            ..self.clone()
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
