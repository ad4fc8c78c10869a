//! The instrument session facade
//!
//! Wires a catalog, a config, the per-frame engine, and the audio output
//! into one object with a single hot path: `process_frame`. Hosts feed it
//! hand landmarks plus a timestamp and get back the triggers that fired;
//! everything else (flash state, fretting, statistics) is readable between
//! frames.

use std::collections::{HashMap, HashSet};

use crate::audio::AudioEngine;
use crate::catalog::{Catalog, ZoneId};
use crate::config::InstrumentConfig;
use crate::consts::{PAD_FLASH_MS, STRING_FLASH_MS};
use crate::engine::collision::{Hand, detect};
use crate::engine::geometry::{ZoneGeometry, ZoneLayout};
use crate::engine::stats::StatisticsTracker;
use crate::engine::trigger::{ActiveZoneSet, TriggerEvent, TriggerKind, TriggerStateMachine};

/// Default location of the sampled drum kit, relative to the host
const DEFAULT_SAMPLE_BASE: &str = "samples";

pub struct Instrument {
    config: InstrumentConfig,
    geometry: ZoneGeometry,
    container: (f32, f32),
    triggers: TriggerStateMachine,
    stats: StatisticsTracker,
    audio: AudioEngine,
    active: ActiveZoneSet,
    fretted: HashMap<ZoneId, u32>,
    on_hit: Option<Box<dyn FnMut(ZoneId)>>,
    enabled: bool,
}

impl Instrument {
    /// Open an instrument session with live audio output
    pub fn new(catalog: Catalog, config: InstrumentConfig) -> Self {
        let audio = AudioEngine::new(
            config.variant,
            config.effective_volume(),
            DEFAULT_SAMPLE_BASE,
        );
        Self::with_audio(catalog, config, audio)
    }

    /// A session with no audio output, for headless hosts and tests
    pub fn headless(catalog: Catalog, config: InstrumentConfig) -> Self {
        let audio = AudioEngine::muted(config.variant);
        Self::with_audio(catalog, config, audio)
    }

    pub fn with_audio(catalog: Catalog, config: InstrumentConfig, audio: AudioEngine) -> Self {
        Self {
            config,
            geometry: ZoneGeometry::new(catalog),
            container: (0.0, 0.0),
            triggers: TriggerStateMachine::new(),
            stats: StatisticsTracker::new(),
            audio,
            active: ActiveZoneSet::default(),
            fretted: HashMap::new(),
            on_hit: None,
            enabled: true,
        }
    }

    /// Run one tracking frame.
    ///
    /// `hands` is `None` when the tracker produced no result this frame; the
    /// previous occupancy is kept so a dropout does not fake an exit/re-entry
    /// edge. `Some(&[])` means the tracker ran and saw no hands, which does
    /// clear occupancy. Returns the triggers that fired, already sounded and
    /// recorded.
    pub fn process_frame(&mut self, hands: Option<&[Hand]>, now_ms: f64) -> Vec<TriggerEvent> {
        if !self.enabled {
            return Vec::new();
        }
        let (width, height) = self.container;
        if width <= 0.0 || height <= 0.0 {
            return Vec::new();
        }
        let Some(hands) = hands else {
            return Vec::new();
        };

        let layout = self.geometry.layout(width, height, &self.config);
        let mut contacts = detect(hands, &layout, &self.config);

        // Fretting is rebuilt from this frame's fret-sub-zone contacts: a
        // string with no candidate reads open, and a frame with no fret
        // contact anywhere resets every string at once.
        self.fretted = std::mem::take(&mut contacts.fret_candidates);

        let events = self
            .triggers
            .advance(contacts, &layout, &self.fretted, &self.config, now_ms);

        for event in &events {
            match event.kind {
                TriggerKind::Pad => {
                    self.audio.trigger_pad(event.zone);
                    self.active.flash(event.zone, now_ms, PAD_FLASH_MS);
                }
                TriggerKind::Pluck { frequency, .. } => {
                    self.audio.trigger_string(frequency);
                    self.active.flash(event.zone, now_ms, STRING_FLASH_MS);
                }
            }
            self.stats.record(event.at_ms);
            if let Some(on_hit) = &mut self.on_hit {
                on_hit(event.zone);
            }
        }
        events
    }

    /// Update the tracked container size (pixels)
    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.container = (width, height);
    }

    /// Swap in a new config between frames; audio follows immediately
    pub fn apply_config(&mut self, config: InstrumentConfig) {
        self.audio.set_volume(config.effective_volume());
        self.audio.set_variant(config.variant);
        self.config = config;
    }

    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    /// Register a callback invoked once per accepted trigger
    pub fn set_on_hit(&mut self, callback: impl FnMut(ZoneId) + 'static) {
        self.on_hit = Some(Box::new(callback));
    }

    /// Pause or resume frame processing; disabled frames are dropped whole
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Zones currently inside their post-hit flash window
    pub fn active_zones(&mut self, now_ms: f64) -> HashSet<ZoneId> {
        self.active.snapshot(now_ms)
    }

    /// Current fret per string (absent or 0 means open)
    pub fn fretted(&self) -> &HashMap<ZoneId, u32> {
        &self.fretted
    }

    /// The zone layout for the current container and config
    pub fn layout(&mut self) -> ZoneLayout {
        self.geometry
            .layout(self.container.0, self.container.1, &self.config)
    }

    /// Construction is synchronous, so a built instrument is always ready;
    /// kept for hosts that poll readiness before showing the play surface.
    pub fn is_ready(&self) -> bool {
        true
    }

    /// Whether the audio backend actually opened an output
    pub fn has_audio_output(&self) -> bool {
        self.audio.has_output()
    }

    pub fn hits(&self) -> u64 {
        self.stats.hits()
    }

    pub fn combo(&self, now_ms: f64) -> u32 {
        self.stats.combo(now_ms)
    }

    pub fn tempo_bpm(&self) -> Option<u32> {
        self.stats.tempo_bpm()
    }

    /// Tear the session down: release audio, forget all trigger history,
    /// and ignore any further frames.
    pub fn shutdown(&mut self) {
        self.audio.shutdown();
        self.triggers.reset();
        self.fretted.clear();
        self.active = ActiveZoneSet::default();
        self.enabled = false;
    }
}
