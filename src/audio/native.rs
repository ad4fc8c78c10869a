//! cpal output backend
//!
//! One output stream with an additive mixer in the callback. The engine
//! thread sends finished voice descriptions over a channel; the callback
//! drains it, renders, and drops voices that have played out. Master gain
//! crosses threads as raw f32 bits in an atomic.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::timbre::{Timbre, Waveform, envelope_gain, frequency_at};
use crate::catalog::{PAD_SAMPLE_FILES, ZoneId};

/// Oldest voices are dropped past this point
const MAX_VOICES: usize = 48;

/// A mono sample decoded at load time
struct SampleData {
    frames: Vec<f32>,
    source_rate: f32,
}

enum Voice {
    Osc { timbre: Timbre, t: f32, phase: f32 },
    Sample { data: Arc<SampleData>, pos: f32 },
}

impl Voice {
    /// Next mono sample, or None once the voice has played out
    fn next(&mut self, dt: f32, out_rate: f32) -> Option<f32> {
        match self {
            Voice::Osc { timbre, t, phase } => {
                if *t >= timbre.duration_s {
                    return None;
                }
                let freq = frequency_at(timbre, *t);
                *phase = (*phase + freq * dt).fract();
                let out = waveform_sample(timbre.wave, *phase) * envelope_gain(timbre, *t);
                *t += dt;
                Some(out)
            }
            Voice::Sample { data, pos } => {
                let i = *pos as usize;
                if i >= data.frames.len() {
                    return None;
                }
                let out = data.frames[i];
                *pos += data.source_rate / out_rate;
                Some(out)
            }
        }
    }
}

fn waveform_sample(wave: Waveform, phase: f32) -> f32 {
    match wave {
        Waveform::Sine => (std::f32::consts::TAU * phase).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

type SampleStore = Arc<Mutex<HashMap<ZoneId, Arc<SampleData>>>>;

/// Decode one sample file into the store. A failed decode logs and leaves
/// the rest of the kit untouched; a result arriving after teardown is
/// dropped via the liveness flag.
fn install_sample(samples: &SampleStore, alive: &AtomicBool, zone: ZoneId, path: &Path) {
    match load_wav(path) {
        Ok(data) => {
            if alive.load(Ordering::Acquire)
                && let Ok(mut map) = samples.lock()
            {
                map.insert(zone, Arc::new(data));
            }
        }
        Err(err) => log::warn!("failed to load sample {}: {err}", path.display()),
    }
}

fn loaded_sample(samples: &SampleStore, zone: ZoneId) -> Option<Arc<SampleData>> {
    match samples.lock() {
        Ok(map) => map.get(zone).cloned(),
        Err(_) => None,
    }
}

pub(super) struct Backend {
    // Dropping the stream releases the device
    _stream: cpal::Stream,
    master_gain: Arc<AtomicU32>,
    voice_tx: Sender<Voice>,
    samples: SampleStore,
    alive: Arc<AtomicBool>,
    prefetch_started: bool,
}

impl Backend {
    pub fn new(initial_gain: f32) -> Option<Self> {
        let host = cpal::default_host();
        let Some(device) = host.default_output_device() else {
            log::warn!("no default audio output device");
            return None;
        };
        let supported = match device.default_output_config() {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("no usable output config: {err}");
                return None;
            }
        };
        if supported.sample_format() != cpal::SampleFormat::F32 {
            log::warn!(
                "unsupported output sample format {:?}",
                supported.sample_format()
            );
            return None;
        }
        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.config();

        let master_gain = Arc::new(AtomicU32::new(initial_gain.to_bits()));
        let (voice_tx, voice_rx): (Sender<Voice>, Receiver<Voice>) = channel();

        let gain_for_cb = Arc::clone(&master_gain);
        let mut voices: Vec<Voice> = Vec::new();
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    while let Ok(voice) = voice_rx.try_recv() {
                        voices.push(voice);
                    }
                    if voices.len() > MAX_VOICES {
                        let excess = voices.len() - MAX_VOICES;
                        voices.drain(..excess);
                    }
                    let gain = f32::from_bits(gain_for_cb.load(Ordering::Acquire));
                    let dt = 1.0 / sample_rate;
                    for frame in data.chunks_mut(channels) {
                        let mut mix = 0.0;
                        voices.retain_mut(|voice| match voice.next(dt, sample_rate) {
                            Some(s) => {
                                mix += s;
                                true
                            }
                            None => false,
                        });
                        let out = mix * gain;
                        for channel in frame {
                            *channel = out;
                        }
                    }
                },
                |err| log::warn!("audio stream error: {err}"),
                None,
            )
            .map_err(|err| log::warn!("failed to open output stream: {err}"))
            .ok()?;
        stream
            .play()
            .map_err(|err| log::warn!("failed to start output stream: {err}"))
            .ok()?;

        Some(Self {
            _stream: stream,
            master_gain,
            voice_tx,
            samples: Arc::new(Mutex::new(HashMap::new())),
            alive: Arc::new(AtomicBool::new(true)),
            prefetch_started: false,
        })
    }

    pub fn set_master_gain(&self, gain: f32) {
        self.master_gain.store(gain.to_bits(), Ordering::Release);
    }

    pub fn play_timbre(&self, timbre: &Timbre) {
        let _ = self.voice_tx.send(Voice::Osc {
            timbre: *timbre,
            t: 0.0,
            phase: 0.0,
        });
    }

    /// Returns false when the pad's sample is not loaded
    pub fn play_sample(&self, zone: ZoneId) -> bool {
        match loaded_sample(&self.samples, zone) {
            Some(data) => {
                let _ = self.voice_tx.send(Voice::Sample { data, pos: 0.0 });
                true
            }
            None => false,
        }
    }

    /// Decode the pad samples on background threads.
    ///
    /// Each file loads independently; a failed file is logged and skipped
    /// while the rest of the kit keeps working.
    pub fn prefetch_samples(&mut self, base: &str) {
        if self.prefetch_started {
            return;
        }
        self.prefetch_started = true;
        for (zone, file) in PAD_SAMPLE_FILES {
            let path = Path::new(base).join(file);
            let samples = Arc::clone(&self.samples);
            let alive = Arc::clone(&self.alive);
            std::thread::spawn(move || install_sample(&samples, &alive, zone, &path));
        }
    }

    /// cpal streams start on `play`, so this is a no-op after `new`; kept to
    /// mirror the suspended-context dance the web backend needs.
    pub fn resume(&self) {
        let _ = self._stream.play();
    }

    pub fn close(self) {
        self.alive.store(false, Ordering::Release);
        // Stream dropped here
    }
}

fn load_wav(path: &Path) -> Result<SampleData, hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let raw: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };
    let channels = spec.channels.max(1) as usize;
    let frames = raw
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok(SampleData {
        frames,
        source_rate: spec.sample_rate as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::timbre::pluck;

    #[test]
    fn osc_voice_ends_at_its_duration() {
        let mut voice = Voice::Osc {
            timbre: pluck(440.0),
            t: 0.0,
            phase: 0.0,
        };
        let rate = 48_000.0;
        let dt = 1.0 / rate;
        let mut count = 0usize;
        while voice.next(dt, rate).is_some() {
            count += 1;
        }
        // 0.3s at 48kHz, within float accumulation error
        assert!((14_399..=14_401).contains(&count), "played {count} frames");
    }

    #[test]
    fn sample_voice_resamples_to_the_output_rate() {
        let data = Arc::new(SampleData {
            frames: vec![0.5; 100],
            source_rate: 22_050.0,
        });
        let mut voice = Voice::Sample { data, pos: 0.0 };
        let mut count = 0usize;
        while voice.next(1.0 / 44_100.0, 44_100.0).is_some() {
            count += 1;
        }
        // Half-rate source plays back over twice as many output frames
        assert_eq!(count, 200);
    }

    fn write_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
        for i in 0..64i16 {
            writer.write_sample(i * 100).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn load_wav_reports_missing_files() {
        assert!(load_wav(Path::new("/nonexistent/airband/kick.wav")).is_err());
    }

    #[test]
    fn one_bad_sample_leaves_the_rest_of_the_kit_loaded() {
        let dir = std::env::temp_dir().join(format!("airband-kit-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        for (zone, file) in PAD_SAMPLE_FILES {
            let path = dir.join(file);
            if zone == "snare" {
                std::fs::write(&path, b"not a wav").expect("write garbage");
            } else {
                write_wav(&path);
            }
        }

        let samples = SampleStore::default();
        let alive = AtomicBool::new(true);
        for (zone, file) in PAD_SAMPLE_FILES {
            install_sample(&samples, &alive, zone, &dir.join(file));
        }

        // The corrupt file isolates to its own pad
        assert!(loaded_sample(&samples, "snare").is_none());
        for zone in ["hihat", "crash", "tomHigh", "tomLow", "kick"] {
            assert!(loaded_sample(&samples, zone).is_some(), "missing {zone}");
        }
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn samples_arriving_after_teardown_are_dropped() {
        let dir = std::env::temp_dir().join(format!("airband-late-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("kick.wav");
        write_wav(&path);

        let samples = SampleStore::default();
        let alive = AtomicBool::new(false);
        install_sample(&samples, &alive, "kick", &path);

        assert!(loaded_sample(&samples, "kick").is_none());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn waveforms_stay_in_range() {
        for wave in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            for i in 0..100 {
                let s = waveform_sample(wave, i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&s), "{wave:?} out of range: {s}");
            }
        }
    }
}
