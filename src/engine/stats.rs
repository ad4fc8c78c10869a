//! Session statistics derived from the trigger-event timeline
//!
//! Tracks total hits, the combo streak, and a tempo estimate over the most
//! recent hits. All timestamps come from the frame pass, so the tracker is
//! deterministic and has no timers: combo idle decay is applied on read.

use std::collections::VecDeque;

use crate::consts::{COMBO_WINDOW_MS, TEMPO_WINDOW};

#[derive(Debug, Clone, Default)]
pub struct StatisticsTracker {
    hits: u64,
    combo: u32,
    last_hit_ms: Option<f64>,
    recent: VecDeque<f64>,
}

impl StatisticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one accepted trigger
    pub fn record(&mut self, at_ms: f64) {
        self.hits += 1;

        self.recent.push_back(at_ms);
        if self.recent.len() > TEMPO_WINDOW {
            self.recent.pop_front();
        }

        self.combo = match self.last_hit_ms {
            Some(last) if at_ms - last <= COMBO_WINDOW_MS => self.combo + 1,
            _ => 1,
        };
        self.last_hit_ms = Some(at_ms);
    }

    /// Total hits this session
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Current streak; reads as 0 once the combo window passes with no hit
    pub fn combo(&self, now_ms: f64) -> u32 {
        match self.last_hit_ms {
            Some(last) if now_ms - last <= COMBO_WINDOW_MS => self.combo,
            _ => 0,
        }
    }

    /// Estimated tempo in BPM over the recent-hit buffer; None under 2 hits
    pub fn tempo_bpm(&self) -> Option<u32> {
        if self.recent.len() < 2 {
            return None;
        }
        let total: f64 = self
            .recent
            .iter()
            .zip(self.recent.iter().skip(1))
            .map(|(a, b)| b - a)
            .sum();
        let avg = total / (self.recent.len() - 1) as f64;
        if avg <= 0.0 {
            return None;
        }
        Some((60_000.0 / avg).round() as u32)
    }
}
