//! Live instrument tunables
//!
//! Pure data, hot-reconfigurable between frames. Out-of-range values are
//! clamped by the `effective_*` accessors, never rejected.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_STRING_COOLDOWN_MS;

/// Pad sound variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoundVariant {
    /// Procedural one-shot voices from the timbre table
    #[default]
    Synth,
    /// Pre-decoded samples played back verbatim
    Sampled,
}

/// Instrument settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Pad size multiplier applied to the catalog base size
    pub pad_scale: f32,
    /// Fraction of container height the string stack occupies
    pub string_spacing: f32,
    /// Visual thickness of a string band (px)
    pub string_thickness_px: f32,
    /// Extra hit-detection padding around zones (px)
    pub hit_padding: f32,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Pad sound variant
    pub variant: SoundVariant,
    /// Enabled pad ids; `None` enables every pad in the catalog
    pub enabled_pads: Option<Vec<String>>,
    /// Number of frets in the fret sub-zone
    pub fret_count: u32,
    /// Width ratio (0-1) of the fret sub-zone on the left
    pub fret_zone_width_ratio: f32,
    /// Width ratio (0-1) of the strum sub-zone on the right
    pub strum_zone_width_ratio: f32,
    /// Per-string retrigger cooldown (ms)
    pub string_cooldown_ms: f64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            pad_scale: 1.0,
            string_spacing: 0.28,
            string_thickness_px: 12.0,
            hit_padding: 0.0,
            volume: 1.0,
            variant: SoundVariant::Synth,
            enabled_pads: None,
            fret_count: 20,
            fret_zone_width_ratio: 0.67,
            strum_zone_width_ratio: 0.33,
            string_cooldown_ms: DEFAULT_STRING_COOLDOWN_MS,
        }
    }
}

impl InstrumentConfig {
    /// Parse a host settings blob; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pad scale, guarded against non-finite or negative input
    pub fn effective_pad_scale(&self) -> f32 {
        if self.pad_scale.is_finite() {
            self.pad_scale.max(0.0)
        } else {
            1.0
        }
    }

    /// String spacing clamped to the playable range
    pub fn effective_string_spacing(&self) -> f32 {
        if self.string_spacing.is_finite() {
            self.string_spacing.clamp(0.2, 0.34)
        } else {
            0.28
        }
    }

    /// Hit padding, never negative
    pub fn effective_hit_padding(&self) -> f32 {
        if self.hit_padding.is_finite() {
            self.hit_padding.max(0.0)
        } else {
            0.0
        }
    }

    /// Master volume clamped to [0, 1]
    pub fn effective_volume(&self) -> f32 {
        if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Fret count, at least 1
    pub fn effective_fret_count(&self) -> u32 {
        self.fret_count.max(1)
    }

    /// Fret sub-zone width ratio clamped to [0, 0.9]
    pub fn effective_fret_zone_ratio(&self) -> f32 {
        if self.fret_zone_width_ratio.is_finite() {
            self.fret_zone_width_ratio.clamp(0.0, 0.9)
        } else {
            0.67
        }
    }

    /// Strum sub-zone width ratio clamped to [0, 0.9]
    pub fn effective_strum_zone_ratio(&self) -> f32 {
        if self.strum_zone_width_ratio.is_finite() {
            self.strum_zone_width_ratio.clamp(0.0, 0.9)
        } else {
            0.33
        }
    }

    /// String cooldown, never negative
    pub fn effective_string_cooldown_ms(&self) -> f64 {
        if self.string_cooldown_ms.is_finite() {
            self.string_cooldown_ms.max(0.0)
        } else {
            DEFAULT_STRING_COOLDOWN_MS
        }
    }

    /// Whether a pad id participates in collision detection
    pub fn pad_enabled(&self, id: &str) -> bool {
        match &self.enabled_pads {
            Some(ids) => ids.iter().any(|p| p == id),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_values_clamp_instead_of_failing() {
        let cfg = InstrumentConfig {
            string_spacing: 5.0,
            volume: -2.0,
            fret_count: 0,
            fret_zone_width_ratio: 1.4,
            strum_zone_width_ratio: -0.5,
            hit_padding: -10.0,
            ..Default::default()
        };

        assert_eq!(cfg.effective_string_spacing(), 0.34);
        assert_eq!(cfg.effective_volume(), 0.0);
        assert_eq!(cfg.effective_fret_count(), 1);
        assert_eq!(cfg.effective_fret_zone_ratio(), 0.9);
        assert_eq!(cfg.effective_strum_zone_ratio(), 0.0);
        assert_eq!(cfg.effective_hit_padding(), 0.0);
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let cfg = InstrumentConfig {
            string_spacing: f32::NAN,
            volume: f32::INFINITY,
            string_cooldown_ms: f64::NAN,
            ..Default::default()
        };

        assert_eq!(cfg.effective_string_spacing(), 0.28);
        assert_eq!(cfg.effective_volume(), 1.0);
        assert_eq!(cfg.effective_string_cooldown_ms(), 200.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = InstrumentConfig::from_json(r#"{"volume":0.5,"variant":"sampled"}"#)
            .expect("valid settings");
        assert_eq!(cfg.volume, 0.5);
        assert_eq!(cfg.variant, SoundVariant::Sampled);
        assert_eq!(cfg.fret_count, 20);
        assert_eq!(cfg.string_spacing, 0.28);
    }

    #[test]
    fn enabled_pads_default_to_all() {
        let cfg = InstrumentConfig::default();
        assert!(cfg.pad_enabled("snare"));

        let cfg = InstrumentConfig {
            enabled_pads: Some(vec!["kick".into()]),
            ..Default::default()
        };
        assert!(cfg.pad_enabled("kick"));
        assert!(!cfg.pad_enabled("snare"));
    }
}
