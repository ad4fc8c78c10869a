//! Edge-triggered hit detection
//!
//! Diffs successive occupancy snapshots per finger class, applies per-zone
//! cooldowns, and emits trigger events. Pads are purely edge-triggered
//! (cooldown 0: re-trigger requires leaving and re-entering); strings add a
//! wall-clock cooldown on top of edge-triggering.

use std::collections::{HashMap, HashSet};

use crate::audio::timbre::fret_frequency;
use crate::catalog::ZoneId;
use crate::config::InstrumentConfig;
use crate::engine::collision::{FingerClass, FrameContacts, Occupancy};
use crate::engine::geometry::ZoneLayout;

/// What a trigger should sound like
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerKind {
    Pad,
    Pluck { frequency: f32, fret: u32 },
}

/// One accepted trigger; ephemeral, consumed immediately
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEvent {
    pub zone: ZoneId,
    pub at_ms: f64,
    pub kind: TriggerKind,
}

/// Zones inside their post-hit flash window; purely a rendering hint.
///
/// Entries carry their own expiry timestamp and are pruned on read, so no
/// timer machinery is needed.
#[derive(Debug, Clone, Default)]
pub struct ActiveZoneSet {
    expiry: HashMap<ZoneId, f64>,
}

impl ActiveZoneSet {
    pub fn flash(&mut self, zone: ZoneId, now_ms: f64, window_ms: f64) {
        self.expiry.insert(zone, now_ms + window_ms);
    }

    pub fn contains(&self, zone: ZoneId, now_ms: f64) -> bool {
        self.expiry.get(zone).is_some_and(|&until| now_ms < until)
    }

    /// Zones still flashing; expired entries are dropped
    pub fn snapshot(&mut self, now_ms: f64) -> HashSet<ZoneId> {
        self.expiry.retain(|_, until| *until > now_ms);
        self.expiry.keys().copied().collect()
    }
}

/// The per-session trigger state machine
#[derive(Debug, Clone, Default)]
pub struct TriggerStateMachine {
    prev: Occupancy,
    last_trigger: HashMap<ZoneId, f64>,
}

impl TriggerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff this frame's contacts against the previous frame and emit
    /// accepted triggers.
    ///
    /// Fires (finger, zone) iff the zone is newly occupied by that finger
    /// class this frame and the zone's cooldown has elapsed. Afterwards the
    /// previous occupancy is replaced wholesale by the current snapshot, so a
    /// finger class with no current contacts has no history and its next
    /// contact is a fresh edge.
    pub fn advance(
        &mut self,
        contacts: FrameContacts,
        layout: &ZoneLayout,
        fretted: &HashMap<ZoneId, u32>,
        cfg: &InstrumentConfig,
        now_ms: f64,
    ) -> Vec<TriggerEvent> {
        let string_cooldown = cfg.effective_string_cooldown_ms();
        let mut events = Vec::new();

        for finger in FingerClass::ALL {
            // Iterate zones in layout order for deterministic event order
            for pad in &layout.pads {
                if contacts.occupancy.contains(finger, pad.id)
                    && !self.prev.contains(finger, pad.id)
                {
                    // Pads: cooldown 0, pure edge
                    self.last_trigger.insert(pad.id, now_ms);
                    events.push(TriggerEvent {
                        zone: pad.id,
                        at_ms: now_ms,
                        kind: TriggerKind::Pad,
                    });
                }
            }
            for string in &layout.strings {
                if !contacts.occupancy.contains(finger, string.id)
                    || self.prev.contains(finger, string.id)
                {
                    continue;
                }
                let last = self
                    .last_trigger
                    .get(string.id)
                    .copied()
                    .unwrap_or(f64::NEG_INFINITY);
                if now_ms - last < string_cooldown {
                    continue;
                }
                self.last_trigger.insert(string.id, now_ms);
                let fret = fretted.get(string.id).copied().unwrap_or(0);
                let frequency = fret_frequency(string.base_frequency, fret);
                events.push(TriggerEvent {
                    zone: string.id,
                    at_ms: now_ms,
                    kind: TriggerKind::Pluck { frequency, fret },
                });
            }
        }

        self.prev = contacts.occupancy;
        events
    }

    /// Forget all edge and cooldown history (used on teardown)
    pub fn reset(&mut self) {
        self.prev = Occupancy::default();
        self.last_trigger.clear();
    }
}
