//! Deterministic per-frame pipeline
//!
//! All trigger logic lives here. This module must stay pure and
//! deterministic: timestamps are supplied by the caller, iteration order is
//! the catalog order, and there are no platform dependencies.

pub mod collision;
pub mod geometry;
pub mod stats;
pub mod trigger;

pub use collision::{FingerClass, FrameContacts, Hand, Landmark, Occupancy, detect};
pub use geometry::{PadZone, StringZone, ZoneGeometry, ZoneLayout};
pub use stats::StatisticsTracker;
pub use trigger::{ActiveZoneSet, TriggerEvent, TriggerKind, TriggerStateMachine};
