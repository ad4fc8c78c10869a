//! Shared helpers for unit tests: synthetic hands and zone-relative points.

use crate::consts::HAND_LANDMARKS;
use crate::engine::collision::{FingerClass, Hand, Landmark};
use crate::engine::geometry::ZoneLayout;

/// Normalized position that stays clear of every default zone: it mirrors to
/// the top-right corner, outside the pads and above the string bands.
const NEUTRAL: (f32, f32) = (0.05, 0.05);

fn landmark(x: f32, y: f32) -> Landmark {
    Landmark {
        x,
        y,
        z: 0.0,
        visibility: 1.0,
    }
}

/// Build a hand with the given fingertips placed and every other landmark at
/// the neutral position.
pub fn hand_with_tips(tips: &[(FingerClass, f32, f32)]) -> Hand {
    let mut hand = [landmark(NEUTRAL.0, NEUTRAL.1); HAND_LANDMARKS];
    for &(finger, x, y) in tips {
        hand[finger.landmark_index()] = landmark(x, y);
    }
    hand
}

/// A hand with only the index fingertip placed
pub fn hand_with_index(x: f32, y: f32) -> Hand {
    hand_with_tips(&[(FingerClass::Index, x, y)])
}

/// A hand touching nothing
pub fn hand_away() -> Hand {
    hand_with_tips(&[])
}

/// Normalized coordinates that mirror onto the center of a pad
pub fn point_inside_pad(layout: &ZoneLayout, id: &str) -> (f32, f32) {
    let pad = layout
        .pads
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| panic!("no pad {id}"));
    let cx = pad.x_percent / 100.0 * layout.width + pad.width_px / 2.0;
    let cy = pad.y_percent / 100.0 * layout.height + pad.height_px / 2.0;
    (1.0 - cx / layout.width, cy / layout.height)
}

/// Normalized coordinates that mirror onto a string inside its strum sub-zone
pub fn point_on_string(layout: &ZoneLayout, id: &str) -> (f32, f32) {
    let string = layout
        .strings
        .iter()
        .find(|s| s.id == id)
        .unwrap_or_else(|| panic!("no string {id}"));
    let sx = (layout.strum_zone_min_x + layout.width) / 2.0;
    let sy = string.y_percent / 100.0 * layout.height;
    (1.0 - sx / layout.width, sy / layout.height)
}
