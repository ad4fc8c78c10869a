//! Timbre descriptors
//!
//! Every procedural voice is described by data: waveform, strike frequency,
//! optional downward pitch sweep, and a two-stage exponential gain envelope.
//! Pad sounds are looked up by zone identity in an immutable table; there is
//! no per-pad branching anywhere in the audio path.

use crate::catalog::ZoneId;

/// Oscillator waveforms (the Web Audio set)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A one-shot oscillator voice description.
///
/// The gain envelope ramps exponentially from [`GAIN_FLOOR`] to `peak_gain`
/// over `attack_s`, then decays exponentially back to the floor by
/// `decay_s`; the voice stops at `duration_s`. A `sweep_to` frequency makes
/// the pitch glide exponentially downward across the voice (kick drums).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timbre {
    pub wave: Waveform,
    pub frequency: f32,
    pub sweep_to: Option<f32>,
    pub attack_s: f32,
    pub decay_s: f32,
    pub peak_gain: f32,
    pub duration_s: f32,
}

/// Near-silence floor for exponential gain ramps
pub const GAIN_FLOOR: f32 = 0.0001;

/// Synth-variant pad voices, keyed by pad id
pub const PAD_TIMBRES: [(ZoneId, Timbre); 6] = [
    (
        "snare",
        Timbre {
            wave: Waveform::Triangle,
            frequency: 523.25, // C5
            sweep_to: None,
            attack_s: 0.001,
            decay_s: 0.2,
            peak_gain: 0.9,
            duration_s: 0.25,
        },
    ),
    (
        "hihat",
        Timbre {
            wave: Waveform::Square,
            frequency: 783.99, // G5
            sweep_to: None,
            attack_s: 0.001,
            decay_s: 0.1,
            peak_gain: 0.5,
            duration_s: 0.12,
        },
    ),
    (
        "crash",
        Timbre {
            wave: Waveform::Sawtooth,
            frequency: 932.33, // Bb5
            sweep_to: None,
            attack_s: 0.001,
            decay_s: 0.6,
            peak_gain: 0.6,
            duration_s: 0.7,
        },
    ),
    (
        "tomHigh",
        Timbre {
            wave: Waveform::Sine,
            frequency: 246.94, // B3
            sweep_to: None,
            attack_s: 0.01,
            decay_s: 0.3,
            peak_gain: 0.9,
            duration_s: 0.35,
        },
    ),
    (
        "tomLow",
        Timbre {
            wave: Waveform::Sine,
            frequency: 196.0, // G3
            sweep_to: None,
            attack_s: 0.01,
            decay_s: 0.3,
            peak_gain: 0.9,
            duration_s: 0.35,
        },
    ),
    (
        "kick",
        Timbre {
            wave: Waveform::Sine,
            frequency: 120.0,
            sweep_to: Some(40.0),
            attack_s: 0.001,
            decay_s: 0.3,
            peak_gain: 1.0,
            duration_s: 0.35,
        },
    ),
];

/// Pad timbre by zone identity
pub fn timbre_for(zone: ZoneId) -> Option<&'static Timbre> {
    PAD_TIMBRES
        .iter()
        .find(|(id, _)| *id == zone)
        .map(|(_, t)| t)
}

/// The string "pluck": fast attack to a fixed peak, exponential decay to
/// near-silence by ~280ms.
pub fn pluck(frequency: f32) -> Timbre {
    Timbre {
        wave: Waveform::Triangle,
        frequency,
        sweep_to: None,
        attack_s: 0.01,
        decay_s: 0.28,
        peak_gain: 0.6,
        duration_s: 0.3,
    }
}

/// Equal-tempered pitch: each fret raises the open string one semitone
pub fn fret_frequency(base: f32, fret: u32) -> f32 {
    base * 2f32.powf(fret as f32 / 12.0)
}

/// Envelope gain at time `t` seconds into a voice.
///
/// Matches Web Audio `exponentialRampToValueAtTime` semantics:
/// `v(t) = v0 * (v1 / v0)^((t - t0) / (t1 - t0))`.
pub fn envelope_gain(timbre: &Timbre, t: f32) -> f32 {
    if t < 0.0 || t >= timbre.duration_s {
        return 0.0;
    }
    if t < timbre.attack_s {
        GAIN_FLOOR * (timbre.peak_gain / GAIN_FLOOR).powf(t / timbre.attack_s)
    } else if t < timbre.decay_s {
        let span = (timbre.decay_s - timbre.attack_s).max(f32::EPSILON);
        timbre.peak_gain * (GAIN_FLOOR / timbre.peak_gain).powf((t - timbre.attack_s) / span)
    } else {
        GAIN_FLOOR
    }
}

/// Oscillator frequency at time `t`, honoring the pitch sweep
pub fn frequency_at(timbre: &Timbre, t: f32) -> f32 {
    match timbre.sweep_to {
        Some(end) => {
            let k = (t / timbre.duration_s).clamp(0.0, 1.0);
            timbre.frequency * (end / timbre.frequency).powf(k)
        }
        None => timbre.frequency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DRUM_PADS;

    #[test]
    fn every_pad_has_a_timbre() {
        for pad in DRUM_PADS {
            assert!(timbre_for(pad.id).is_some(), "no timbre for {}", pad.id);
        }
        assert!(timbre_for("e2").is_none());
    }

    #[test]
    fn envelope_peaks_at_attack_and_dies_out() {
        let t = pluck(440.0);
        assert!(envelope_gain(&t, 0.0) <= GAIN_FLOOR);
        assert!((envelope_gain(&t, 0.01) - 0.6).abs() < 1e-3);
        assert!((envelope_gain(&t, 0.28) - GAIN_FLOOR).abs() < 1e-3);
        assert_eq!(envelope_gain(&t, 0.3), 0.0);
    }

    #[test]
    fn pluck_decays_monotonically_after_attack() {
        let t = pluck(440.0);
        let mut last = envelope_gain(&t, 0.011);
        let mut time = 0.02;
        while time < 0.28 {
            let g = envelope_gain(&t, time);
            assert!(g <= last);
            last = g;
            time += 0.01;
        }
    }

    #[test]
    fn kick_sweeps_downward() {
        let kick = timbre_for("kick").unwrap();
        assert_eq!(frequency_at(kick, 0.0), 120.0);
        let end = frequency_at(kick, kick.duration_s);
        assert!((end - 40.0).abs() < 1e-3);
        assert!(frequency_at(kick, 0.15) < 120.0);
    }

    #[test]
    fn unswept_voices_hold_their_frequency() {
        let snare = timbre_for("snare").unwrap();
        assert_eq!(frequency_at(snare, 0.0), frequency_at(snare, 0.2));
    }

    proptest::proptest! {
        #[test]
        fn fret_pitch_rises_and_doubles_per_octave(
            base in 80.0f32..400.0,
            fret in 0u32..=20,
        ) {
            proptest::prop_assert!(fret_frequency(base, fret + 1) > fret_frequency(base, fret));
            let octave = fret_frequency(base, fret + 12) / fret_frequency(base, fret);
            proptest::prop_assert!((octave - 2.0).abs() < 1e-3);
        }
    }
}
