//! Per-frame collision detection
//!
//! Maps a frame's fingertip points onto the zone layout and produces the
//! current occupancy snapshot, fret candidates, and the frame-global
//! "any contact in the fret sub-zone" flag. Pure functions, no state.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::catalog::ZoneId;
use crate::config::InstrumentConfig;
use crate::consts::HAND_LANDMARKS;
use crate::engine::geometry::ZoneLayout;
use crate::mirrored_x;

/// A single normalized keypoint from the hand detector.
///
/// All fields are in [0, 1]; origin is the top-left of the camera image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Landmark {
    /// Project onto mirrored screen space (pixels)
    pub fn to_screen(self, width: f32, height: f32) -> Vec2 {
        Vec2::new(mirrored_x(self.x, width), self.y * height)
    }
}

/// A fixed 21-point hand skeleton
pub type Hand = [Landmark; HAND_LANDMARKS];

/// The five canonical fingertip landmarks used as trigger points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerClass {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerClass {
    pub const ALL: [FingerClass; 5] = [
        FingerClass::Thumb,
        FingerClass::Index,
        FingerClass::Middle,
        FingerClass::Ring,
        FingerClass::Pinky,
    ];

    /// MediaPipe landmark index of this fingertip
    pub fn landmark_index(self) -> usize {
        match self {
            FingerClass::Thumb => 4,
            FingerClass::Index => 8,
            FingerClass::Middle => 12,
            FingerClass::Ring => 16,
            FingerClass::Pinky => 20,
        }
    }

    fn slot(self) -> usize {
        match self {
            FingerClass::Thumb => 0,
            FingerClass::Index => 1,
            FingerClass::Middle => 2,
            FingerClass::Ring => 3,
            FingerClass::Pinky => 4,
        }
    }
}

/// Zones currently touched, per finger class.
///
/// Occupancy is keyed by finger class, not by hand: two hands' index tips in
/// the same zone share one slot.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    slots: [HashSet<ZoneId>; 5],
}

impl Occupancy {
    pub fn insert(&mut self, finger: FingerClass, zone: ZoneId) {
        self.slots[finger.slot()].insert(zone);
    }

    pub fn contains(&self, finger: FingerClass, zone: ZoneId) -> bool {
        self.slots[finger.slot()].contains(zone)
    }

    pub fn zones(&self, finger: FingerClass) -> &HashSet<ZoneId> {
        &self.slots[finger.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_empty())
    }
}

/// Everything collision detection learns about one frame
#[derive(Debug, Clone, Default)]
pub struct FrameContacts {
    pub occupancy: Occupancy,
    /// Highest fret candidate per string this frame (absent = no candidate)
    pub fret_candidates: HashMap<ZoneId, u32>,
    /// True when any fingertip was inside any fret sub-zone at all
    pub any_fret_contact: bool,
}

/// Run collision detection for one frame.
///
/// Degenerate geometry (width or height 0) yields empty contacts rather than
/// an error.
pub fn detect(hands: &[Hand], layout: &ZoneLayout, cfg: &InstrumentConfig) -> FrameContacts {
    let mut contacts = FrameContacts::default();
    if layout.width <= 0.0 || layout.height <= 0.0 {
        return contacts;
    }

    let padding = cfg.effective_hit_padding();
    let fret_count = cfg.effective_fret_count();

    for hand in hands {
        for finger in FingerClass::ALL {
            let tip = hand[finger.landmark_index()].to_screen(layout.width, layout.height);

            // Pads: axis-aligned containment, expanded by hit padding
            for pad in &layout.pads {
                let origin = Vec2::new(
                    pad.x_percent / 100.0 * layout.width,
                    pad.y_percent / 100.0 * layout.height,
                );
                let min = origin - Vec2::splat(padding);
                let max = origin + Vec2::new(pad.width_px, pad.height_px) + Vec2::splat(padding);
                if tip.cmpge(min).all() && tip.cmple(max).all() {
                    contacts.occupancy.insert(finger, pad.id);
                }
            }

            if layout.strings.is_empty() {
                continue;
            }

            // Fret pass
            if tip.x <= layout.fret_zone_max_x {
                contacts.any_fret_contact = true;
            }
            for string in &layout.strings {
                let center_y = string.y_percent / 100.0 * layout.height;
                let band_half = string.thickness_px / 2.0 + padding;
                let in_band = (tip.y - center_y).abs() <= band_half;

                if in_band && tip.x <= layout.fret_zone_max_x {
                    let raw = tip.x / layout.fret_zone_max_x.max(1.0) * fret_count as f32;
                    let fret = (raw.floor() as u32 + 1).clamp(1, fret_count);
                    let entry = contacts.fret_candidates.entry(string.id).or_insert(0);
                    *entry = (*entry).max(fret);
                }

                // Strum pass: only the strum sub-zone is authorized to sound
                if in_band && tip.x >= layout.strum_zone_min_x {
                    contacts.occupancy.insert(finger, string.id);
                }
            }
        }
    }

    contacts
}
