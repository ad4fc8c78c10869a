//! Audio output
//!
//! A thin facade over a platform backend: Web Audio on wasm, a cpal output
//! stream everywhere else. Backend construction can fail (no device, no
//! `AudioContext`); failure is caught and logged, and every trigger becomes
//! a silent no-op while the rest of the instrument keeps running.

pub mod timbre;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
use native::Backend;
#[cfg(target_arch = "wasm32")]
use web::Backend;

use crate::catalog::ZoneId;
use crate::config::SoundVariant;
use timbre::{pluck, timbre_for};

/// Perceptual master-gain curve.
///
/// Logarithmic at low volumes, with an extra shaped boost above 0.4 so the
/// top of the dial reaches gain 2.0 instead of flattening out.
pub fn volume_scale(volume: f32) -> f32 {
    let v = if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let log_gain = (1.0 + 9.0 * v).log10();
    if v <= 0.4 {
        2.0 * log_gain
    } else {
        let shaped = ((v - 0.4) / 0.6).powf(0.6);
        2.0 * (log_gain + (1.0 - log_gain) * shaped)
    }
}

/// The audio engine owned by an instrument session
pub struct AudioEngine {
    backend: Option<Backend>,
    variant: SoundVariant,
    sample_base: String,
    samples_requested: bool,
}

impl AudioEngine {
    /// Open the platform audio output.
    ///
    /// Never fails: when no output is available the engine stays usable and
    /// every trigger is swallowed.
    pub fn new(variant: SoundVariant, volume: f32, sample_base: &str) -> Self {
        let backend = Backend::new(volume_scale(volume));
        if backend.is_none() {
            log::warn!("audio output unavailable; triggers will be silent");
        }
        let mut engine = Self {
            backend,
            variant,
            sample_base: sample_base.to_owned(),
            samples_requested: false,
        };
        if variant == SoundVariant::Sampled {
            engine.request_samples();
        }
        engine
    }

    /// An engine with no output at all, for headless use and tests
    pub fn muted(variant: SoundVariant) -> Self {
        Self {
            backend: None,
            variant,
            sample_base: String::new(),
            samples_requested: false,
        }
    }

    /// Whether the output backend opened successfully
    pub fn has_output(&self) -> bool {
        self.backend.is_some()
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(backend) = &self.backend {
            backend.set_master_gain(volume_scale(volume));
        }
    }

    /// Switch pad variants; the first switch to sampled kicks off prefetch
    pub fn set_variant(&mut self, variant: SoundVariant) {
        self.variant = variant;
        if variant == SoundVariant::Sampled {
            self.request_samples();
        }
    }

    fn request_samples(&mut self) {
        if self.samples_requested {
            return;
        }
        self.samples_requested = true;
        if let Some(backend) = &mut self.backend {
            let base = self.sample_base.clone();
            backend.prefetch_samples(&base);
        }
    }

    /// Play the voice for a pad hit.
    ///
    /// Sampled variant with a missing sample (load failed or still in
    /// flight) stays silent; there is no procedural fallback.
    pub fn trigger_pad(&mut self, zone: ZoneId) {
        let Some(backend) = &self.backend else {
            return;
        };
        backend.resume();
        match self.variant {
            SoundVariant::Synth => {
                if let Some(timbre) = timbre_for(zone) {
                    backend.play_timbre(timbre);
                }
            }
            SoundVariant::Sampled => {
                if !backend.play_sample(zone) {
                    log::debug!("no sample loaded for pad {zone}");
                }
            }
        }
    }

    /// Play a pluck voice at the given (already fret-shifted) frequency
    pub fn trigger_string(&mut self, frequency: f32) {
        let Some(backend) = &self.backend else {
            return;
        };
        backend.resume();
        backend.play_timbre(&pluck(frequency));
    }

    /// Release the output device; further triggers are silent
    pub fn shutdown(&mut self) {
        if let Some(backend) = self.backend.take() {
            backend.close();
        }
    }
}
