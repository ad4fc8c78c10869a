//! Airband - hand-tracked air instruments
//!
//! Turns a live stream of hand-skeleton keypoints into discrete musical
//! trigger events and drives sound synthesis from them.
//!
//! Core modules:
//! - `catalog`: Pure, stateless instrument definitions (pads, strings, samples)
//! - `config`: Live tunables (scale, sensitivity, volume, zone ratios)
//! - `engine`: Deterministic per-frame pipeline (geometry, collision, triggers, stats)
//! - `audio`: Audio output graph and voice synthesis
//! - `instrument`: The facade wiring a catalog + config + audio into a session

pub mod audio;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod instrument;

pub use catalog::{Catalog, PadDef, StringDef, ZoneId};
pub use config::{InstrumentConfig, SoundVariant};
pub use engine::collision::{FingerClass, Hand, Landmark};
pub use instrument::Instrument;

/// Engine-wide constants
pub mod consts {
    /// Landmarks per detected hand (MediaPipe hand skeleton)
    pub const HAND_LANDMARKS: usize = 21;

    /// Post-hit flash window for pads (ms)
    pub const PAD_FLASH_MS: f64 = 100.0;
    /// Post-hit flash window for strings (ms)
    pub const STRING_FLASH_MS: f64 = 120.0;

    /// Combo chains while consecutive hits stay within this window (ms)
    pub const COMBO_WINDOW_MS: f64 = 1200.0;
    /// Tempo is estimated over this many most recent hits
    pub const TEMPO_WINDOW: usize = 6;

    /// Default per-string retrigger cooldown (ms); pads use 0 (pure edge)
    pub const DEFAULT_STRING_COOLDOWN_MS: f64 = 200.0;
}

/// Convert a normalized landmark X to screen pixels, mirrored.
///
/// The displayed video is mirrored, so detection flips X; Y is unmirrored.
#[inline]
pub fn mirrored_x(norm_x: f32, container_width: f32) -> f32 {
    (1.0 - norm_x) * container_width
}

/// Wasm module init: panic messages and the log facade go to the console
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(test)]
pub(crate) mod testutil;
