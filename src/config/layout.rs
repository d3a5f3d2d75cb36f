//! Layout configuration.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Floats are quantized to integers before hashing (multiply by 1e6 and
//! round to i64), so `params_hash` is stable across serde_json versions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_CONFIG_VERSION;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config document could not be parsed.
    #[error("Invalid layout config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("Invalid layout config value for {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Undo/redo history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of retained history entries.
    pub capacity: usize,
    /// Quiet period before a commit lands, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            debounce_ms: 300,
        }
    }
}

impl HistoryConfig {
    /// Debounce delay as a `Duration`.
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

/// Ring arrangement constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangementConfig {
    /// Triangle side when no explicit radius is given.
    pub triangle_side: f64,
    /// Floor for the heuristic outer radius.
    pub min_outer_radius: f64,
    /// Absolute floor for any ring radius.
    pub absolute_min_radius: f64,
    /// Inner radius as a fraction of the outer radius.
    pub inner_ratio: f64,
    /// Floor for the inner radius when both rings are populated.
    pub min_inner_radius: f64,
    /// Minimum distance between the inner and outer ring.
    pub ring_gap: f64,
    /// Floor for `ring_gap`.
    pub min_ring_gap: f64,
    /// Id substrings that put a node on the inner ring.
    pub inner_ring_markers: Vec<String>,
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            triangle_side: 150.0,
            min_outer_radius: 100.0,
            absolute_min_radius: 10.0,
            inner_ratio: 0.6,
            min_inner_radius: 50.0,
            ring_gap: 20.0,
            min_ring_gap: 10.0,
            inner_ring_markers: Vec::new(),
        }
    }
}

impl ArrangementConfig {
    /// The effective gap between rings.
    pub fn effective_gap(&self) -> f64 {
        self.ring_gap.max(self.min_ring_gap)
    }
}

/// The short simulation kick issued after every arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationPulse {
    /// Starting alpha.
    pub alpha: f64,
    /// Alpha decay per tick.
    pub alpha_decay: Option<f64>,
    /// Target alpha.
    pub alpha_target: f64,
}

impl Default for SimulationPulse {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            alpha_decay: Some(0.05),
            alpha_target: 0.0,
        }
    }
}

/// Configuration for one layout session.
///
/// Passed explicitly into each component at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Config version identifier.
    pub version: String,
    /// History settings.
    pub history: HistoryConfig,
    /// Ring arrangement settings.
    pub arrangement: ArrangementConfig,
    /// Simulation pulse after arrangement.
    pub pulse: SimulationPulse,
    /// Directory that holds snapshot records.
    pub snapshot_dir: PathBuf,
    /// Metadata fields included in clipboard exports.
    pub tracked_metadata_fields: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            history: HistoryConfig::default(),
            arrangement: ArrangementConfig::default(),
            pulse: SimulationPulse::default(),
            snapshot_dir: PathBuf::from("graph-positions"),
            tracked_metadata_fields: Vec::new(),
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "history.capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        let a = &self.arrangement;
        for (field, value) in [
            ("arrangement.triangle_side", a.triangle_side),
            ("arrangement.min_outer_radius", a.min_outer_radius),
            ("arrangement.absolute_min_radius", a.absolute_min_radius),
            ("arrangement.min_inner_radius", a.min_inner_radius),
            ("arrangement.ring_gap", a.ring_gap),
            ("arrangement.min_ring_gap", a.min_ring_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a finite non-negative number, got {value}"),
                });
            }
        }
        if !(a.inner_ratio.is_finite() && a.inner_ratio > 0.0 && a.inner_ratio < 1.0) {
            return Err(ConfigError::Invalid {
                field: "arrangement.inner_ratio",
                reason: format!("must be in (0, 1), got {}", a.inner_ratio),
            });
        }
        Ok(())
    }

    /// Hash of the parameters that influence layout results.
    pub fn params_hash(&self) -> String {
        let a = &self.arrangement;
        let quantized = QuantizedLayoutParams {
            version: self.version.clone(),
            capacity: self.history.capacity,
            debounce_ms: self.history.debounce_ms,
            triangle_side: quantize_float(a.triangle_side),
            min_outer_radius: quantize_float(a.min_outer_radius),
            absolute_min_radius: quantize_float(a.absolute_min_radius),
            inner_ratio: quantize_float(a.inner_ratio),
            min_inner_radius: quantize_float(a.min_inner_radius),
            ring_gap: quantize_float(a.ring_gap),
            min_ring_gap: quantize_float(a.min_ring_gap),
            inner_ring_markers: a.inner_ring_markers.clone(),
        };
        canonical_hash_hex(&quantized)
    }
}

/// Quantize a float to an i64 for deterministic hashing.
fn quantize_float(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

#[derive(Debug, Serialize)]
struct QuantizedLayoutParams {
    version: String,
    capacity: usize,
    debounce_ms: u64,
    triangle_side: i64,
    min_outer_radius: i64,
    absolute_min_radius: i64,
    inner_ratio: i64,
    min_inner_radius: i64,
    ring_gap: i64,
    min_ring_gap: i64,
    inner_ring_markers: Vec<String>,
}
