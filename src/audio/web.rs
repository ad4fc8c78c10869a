//! Web Audio backend
//!
//! Voices are real Web Audio nodes: an oscillator through a per-voice gain
//! node scheduling the envelope with `exponentialRampToValueAtTime`, or a
//! buffer source for decoded samples. Everything hangs off one master gain
//! node so the volume dial is a single parameter write.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioBuffer, AudioContext, AudioContextState, GainNode, OscillatorType, Response,
};

use crate::audio::timbre::{GAIN_FLOOR, Timbre, Waveform};
use crate::catalog::{PAD_SAMPLE_FILES, ZoneId};

pub(super) struct Backend {
    ctx: AudioContext,
    master: GainNode,
    samples: Rc<RefCell<HashMap<ZoneId, AudioBuffer>>>,
    alive: Rc<Cell<bool>>,
    prefetch_started: bool,
}

impl Backend {
    pub fn new(initial_gain: f32) -> Option<Self> {
        let ctx = AudioContext::new()
            .map_err(|err| log::warn!("AudioContext unavailable: {err:?}"))
            .ok()?;
        let master = ctx
            .create_gain()
            .map_err(|err| log::warn!("failed to create master gain: {err:?}"))
            .ok()?;
        master.gain().set_value(initial_gain);
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(|err| log::warn!("failed to connect master gain: {err:?}"))
            .ok()?;
        Some(Self {
            ctx,
            master,
            samples: Rc::new(RefCell::new(HashMap::new())),
            alive: Rc::new(Cell::new(true)),
            prefetch_started: false,
        })
    }

    pub fn set_master_gain(&self, gain: f32) {
        self.master.gain().set_value(gain);
    }

    pub fn play_timbre(&self, timbre: &Timbre) {
        if let Err(err) = self.schedule_voice(timbre) {
            log::warn!("failed to schedule voice: {err:?}");
        }
    }

    fn schedule_voice(&self, timbre: &Timbre) -> Result<(), JsValue> {
        let now = self.ctx.current_time();
        let osc = self.ctx.create_oscillator()?;
        osc.set_type(oscillator_type(timbre.wave));
        let freq = osc.frequency();
        freq.set_value_at_time(timbre.frequency, now)?;
        if let Some(end) = timbre.sweep_to {
            freq.exponential_ramp_to_value_at_time(end, now + timbre.duration_s as f64)?;
        }

        let envelope = self.ctx.create_gain()?;
        let gain = envelope.gain();
        gain.set_value_at_time(GAIN_FLOOR, now)?;
        gain.exponential_ramp_to_value_at_time(timbre.peak_gain, now + timbre.attack_s as f64)?;
        gain.exponential_ramp_to_value_at_time(GAIN_FLOOR, now + timbre.decay_s as f64)?;

        osc.connect_with_audio_node(&envelope)?;
        envelope.connect_with_audio_node(&self.master)?;
        osc.start()?;
        osc.stop_with_when(now + timbre.duration_s as f64)?;
        Ok(())
    }

    /// Returns false when the pad's sample is not loaded
    pub fn play_sample(&self, zone: ZoneId) -> bool {
        let buffer = match self.samples.borrow().get(zone) {
            Some(buffer) => buffer.clone(),
            None => return false,
        };
        let played = (|| -> Result<(), JsValue> {
            let source = self.ctx.create_buffer_source()?;
            source.set_buffer(Some(&buffer));
            source.connect_with_audio_node(&self.master)?;
            source.start()?;
            Ok(())
        })();
        if let Err(err) = played {
            log::warn!("failed to play sample {zone}: {err:?}");
        }
        true
    }

    /// Fetch and decode the pad samples in the background.
    ///
    /// Each file loads independently; a failed fetch is logged and skipped
    /// while the rest of the kit keeps working.
    pub fn prefetch_samples(&mut self, base: &str) {
        if self.prefetch_started {
            return;
        }
        self.prefetch_started = true;
        for (zone, file) in PAD_SAMPLE_FILES {
            let url = format!("{}/{}", base.trim_end_matches('/'), file);
            let ctx = self.ctx.clone();
            let samples = Rc::clone(&self.samples);
            let alive = Rc::clone(&self.alive);
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_and_decode(&ctx, &url).await {
                    Ok(buffer) => {
                        if alive.get() {
                            samples.borrow_mut().insert(zone, buffer);
                        }
                    }
                    Err(err) => log::warn!("failed to load sample {url}: {err:?}"),
                }
            });
        }
    }

    /// Browsers start contexts suspended until a user gesture; kick it here
    pub fn resume(&self) {
        if self.ctx.state() == AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }

    pub fn close(self) {
        self.alive.set(false);
        let _ = self.ctx.close();
    }
}

fn oscillator_type(wave: Waveform) -> OscillatorType {
    match wave {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

async fn fetch_and_decode(ctx: &AudioContext, url: &str) -> Result<AudioBuffer, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let array_buffer: js_sys::ArrayBuffer =
        JsFuture::from(response.array_buffer()?).await?.dyn_into()?;
    let decoded = JsFuture::from(ctx.decode_audio_data(&array_buffer)?).await?;
    decoded.dyn_into::<AudioBuffer>()
}
