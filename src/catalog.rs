//! Instrument catalogs
//!
//! Pure, stateless zone definitions constructed once and passed explicitly
//! into the engine. Positions are percent-of-container; sizes are pixels.

use serde::Serialize;

/// Identifier of a pad or string zone
pub type ZoneId = &'static str;

/// A rectangular drum pad
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PadDef {
    pub id: ZoneId,
    /// Display name of the pad
    pub name: &'static str,
    /// X position as percentage of container width
    pub x_percent: f32,
    /// Y position as percentage of container height
    pub y_percent: f32,
    /// Base width in pixels (before pad scale)
    pub width_px: f32,
    /// Base height in pixels (before pad scale)
    pub height_px: f32,
    pub color: &'static str,
    pub active_color: &'static str,
}

/// A horizontal string band
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StringDef {
    pub id: ZoneId,
    /// Display label (E, A, D, G, B, E)
    pub label: &'static str,
    /// Musical note label (E2 .. E4)
    pub note: &'static str,
    /// Open-string frequency in Hz
    pub base_frequency: f32,
    pub color: &'static str,
    pub active_color: &'static str,
}

/// A complete instrument definition
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub pads: Vec<PadDef>,
    pub strings: Vec<StringDef>,
}

impl Catalog {
    /// The six-piece drum kit
    pub fn drum_kit() -> Self {
        Self {
            pads: DRUM_PADS.to_vec(),
            strings: Vec::new(),
        }
    }

    /// The six-string guitar
    pub fn guitar() -> Self {
        Self {
            pads: Vec::new(),
            strings: GUITAR_STRINGS.to_vec(),
        }
    }
}

/// Drum pad layout: crash/toms across the top, snare and kick within easy
/// reach below. Base size 120x120 px at scale 1.
pub const DRUM_PADS: [PadDef; 6] = [
    PadDef {
        id: "snare",
        name: "Snare",
        x_percent: 20.0,
        y_percent: 20.0,
        width_px: 120.0,
        height_px: 120.0,
        color: "#ef4444",
        active_color: "#dc2626",
    },
    PadDef {
        id: "hihat",
        name: "Hi-Hat",
        x_percent: 70.0,
        y_percent: 20.0,
        width_px: 120.0,
        height_px: 120.0,
        color: "#3b82f6",
        active_color: "#2563eb",
    },
    PadDef {
        id: "crash",
        name: "Crash",
        x_percent: 45.0,
        y_percent: 8.0,
        width_px: 120.0,
        height_px: 120.0,
        color: "#10b981",
        active_color: "#059669",
    },
    PadDef {
        id: "tomHigh",
        name: "High Tom",
        x_percent: 45.0,
        y_percent: 45.0,
        width_px: 120.0,
        height_px: 120.0,
        color: "#ec4899",
        active_color: "#db2777",
    },
    PadDef {
        id: "tomLow",
        name: "Low Tom",
        x_percent: 70.0,
        y_percent: 60.0,
        width_px: 120.0,
        height_px: 120.0,
        color: "#f59e0b",
        active_color: "#d97706",
    },
    PadDef {
        id: "kick",
        name: "Kick",
        x_percent: 20.0,
        y_percent: 60.0,
        width_px: 120.0,
        height_px: 120.0,
        color: "#8b5cf6",
        active_color: "#7c3aed",
    },
];

/// Standard tuning, high E on top
pub const GUITAR_STRINGS: [StringDef; 6] = [
    StringDef {
        id: "e4",
        label: "E",
        note: "E4",
        base_frequency: 329.63,
        color: "#6ee7ff",
        active_color: "#22d3ee",
    },
    StringDef {
        id: "b3",
        label: "B",
        note: "B3",
        base_frequency: 246.94,
        color: "#a5b4fc",
        active_color: "#818cf8",
    },
    StringDef {
        id: "g3",
        label: "G",
        note: "G3",
        base_frequency: 196.0,
        color: "#c4b5fd",
        active_color: "#a78bfa",
    },
    StringDef {
        id: "d3",
        label: "D",
        note: "D3",
        base_frequency: 146.83,
        color: "#fde68a",
        active_color: "#fbbf24",
    },
    StringDef {
        id: "a2",
        label: "A",
        note: "A2",
        base_frequency: 110.0,
        color: "#fcd34d",
        active_color: "#f59e0b",
    },
    StringDef {
        id: "e2",
        label: "E",
        note: "E2",
        base_frequency: 82.41,
        color: "#fca5a5",
        active_color: "#f87171",
    },
];

/// Per-pad sample files for the sampled variant, resolved against a
/// host-supplied base path or URL.
pub const PAD_SAMPLE_FILES: [(ZoneId, &str); 6] = [
    ("snare", "snare.wav"),
    ("hihat", "hihat.wav"),
    ("crash", "crash.wav"),
    ("tomHigh", "tom-high.wav"),
    ("tomLow", "tom-low.wav"),
    ("kick", "kick.wav"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drum_kit_has_six_named_pads() {
        let kit = Catalog::drum_kit();
        let ids: Vec<_> = kit.pads.iter().map(|p| p.id).collect();
        for id in ["hihat", "crash", "tomHigh", "snare", "tomLow", "kick"] {
            assert!(ids.contains(&id), "missing pad {id}");
        }
        assert_eq!(kit.pads.len(), 6);
        assert!(kit.strings.is_empty());
    }

    #[test]
    fn guitar_strings_descend_in_pitch() {
        let guitar = Catalog::guitar();
        assert_eq!(guitar.strings.len(), 6);
        for pair in guitar.strings.windows(2) {
            assert!(pair[0].base_frequency > pair[1].base_frequency);
        }
    }

    #[test]
    fn every_pad_has_a_sample_file() {
        for pad in DRUM_PADS {
            assert!(
                PAD_SAMPLE_FILES.iter().any(|(id, _)| *id == pad.id),
                "no sample for {}",
                pad.id
            );
        }
    }
}
