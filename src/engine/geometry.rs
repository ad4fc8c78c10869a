//! Zone geometry
//!
//! Computes pad/string positions and the fret/strum split from the container
//! size and live scale parameters. Pads keep their center fixed when the pad
//! scale changes; strings are evenly spaced across a configurable slice of
//! the container height.

use crate::catalog::{Catalog, StringDef, ZoneId};
use crate::config::InstrumentConfig;

/// A pad placed in the current container
#[derive(Debug, Clone)]
pub struct PadZone {
    pub id: ZoneId,
    pub name: &'static str,
    /// X position as percentage of container width
    pub x_percent: f32,
    /// Y position as percentage of container height
    pub y_percent: f32,
    /// Scaled width in pixels
    pub width_px: f32,
    /// Scaled height in pixels
    pub height_px: f32,
    pub color: &'static str,
    pub active_color: &'static str,
}

/// A string band placed in the current container
#[derive(Debug, Clone)]
pub struct StringZone {
    pub id: ZoneId,
    pub label: &'static str,
    pub note: &'static str,
    pub base_frequency: f32,
    /// Band center as percentage of container height
    pub y_percent: f32,
    pub thickness_px: f32,
    pub color: &'static str,
    pub active_color: &'static str,
}

/// The full zone picture for one frame
#[derive(Debug, Clone, Default)]
pub struct ZoneLayout {
    pub pads: Vec<PadZone>,
    pub strings: Vec<StringZone>,
    /// Right edge of the fret sub-zone (px)
    pub fret_zone_max_x: f32,
    /// Left edge of the strum sub-zone (px)
    pub strum_zone_min_x: f32,
    pub width: f32,
    pub height: f32,
}

/// Stateful geometry model
///
/// Holds the evolving percent positions of pads so that scale changes shift
/// the position by half the pixel delta and the pad center stays put.
#[derive(Debug, Clone)]
pub struct ZoneGeometry {
    catalog: Catalog,
    pad_percent: Vec<(f32, f32)>,
    last_pad_size: Vec<(f32, f32)>,
}

impl ZoneGeometry {
    pub fn new(catalog: Catalog) -> Self {
        let pad_percent = catalog
            .pads
            .iter()
            .map(|p| (p.x_percent, p.y_percent))
            .collect();
        let last_pad_size = catalog
            .pads
            .iter()
            .map(|p| (p.width_px, p.height_px))
            .collect();
        Self {
            catalog,
            pad_percent,
            last_pad_size,
        }
    }

    /// Compute the zone layout for the given container size and config.
    ///
    /// A 0x0 container still produces a layout (collision detection treats it
    /// as empty); pad re-centering is skipped while the container is
    /// unmeasured because the pixel delta cannot be expressed in percent.
    pub fn layout(&mut self, width: f32, height: f32, cfg: &InstrumentConfig) -> ZoneLayout {
        let scale = cfg.effective_pad_scale();

        let mut pads = Vec::with_capacity(self.catalog.pads.len());
        for (i, def) in self.catalog.pads.iter().enumerate() {
            let w = def.width_px * scale;
            let h = def.height_px * scale;
            let (last_w, last_h) = self.last_pad_size[i];
            if w != last_w || h != last_h {
                if width > 0.0 && height > 0.0 {
                    self.pad_percent[i].0 -= (w - last_w) / 2.0 / width * 100.0;
                    self.pad_percent[i].1 -= (h - last_h) / 2.0 / height * 100.0;
                }
                self.last_pad_size[i] = (w, h);
            }
            if cfg.pad_enabled(def.id) {
                pads.push(PadZone {
                    id: def.id,
                    name: def.name,
                    x_percent: self.pad_percent[i].0,
                    y_percent: self.pad_percent[i].1,
                    width_px: w,
                    height_px: h,
                    color: def.color,
                    active_color: def.active_color,
                });
            }
        }

        let strings = string_rows(
            &self.catalog.strings,
            height,
            cfg.effective_string_spacing(),
            cfg.string_thickness_px,
        );

        let fret_zone_max_x = width * cfg.effective_fret_zone_ratio();
        let strum_zone_min_x =
            (width * (1.0 - cfg.effective_strum_zone_ratio())).max(fret_zone_max_x);

        ZoneLayout {
            pads,
            strings,
            fret_zone_max_x,
            strum_zone_min_x,
            width,
            height,
        }
    }
}

/// Baseline for the top string, as a fraction of container height
const STRING_TOP_BASELINE: f32 = 0.66;

/// Place string bands across `height * spacing`, anchored near the 66% line
/// and pulled up if the stack would overflow. Unknown height degrades to an
/// even 0-100% split.
pub fn string_rows(
    defs: &[StringDef],
    height: f32,
    spacing: f32,
    thickness_px: f32,
) -> Vec<StringZone> {
    if defs.is_empty() {
        return Vec::new();
    }
    let last = (defs.len() - 1).max(1) as f32;

    if height <= 0.0 {
        return defs
            .iter()
            .enumerate()
            .map(|(i, def)| placed(def, i as f32 / last * 100.0, thickness_px))
            .collect();
    }

    let usable = height * spacing;
    let mut top = height * STRING_TOP_BASELINE;
    if top + usable > height {
        top = (height - usable).max(0.0);
    }
    let step = usable / last;

    defs.iter()
        .enumerate()
        .map(|(i, def)| {
            let center_y = top + i as f32 * step;
            placed(def, center_y / height * 100.0, thickness_px)
        })
        .collect()
}

fn placed(def: &StringDef, y_percent: f32, thickness_px: f32) -> StringZone {
    StringZone {
        id: def.id,
        label: def.label,
        note: def.note,
        base_frequency: def.base_frequency,
        y_percent,
        thickness_px,
        color: def.color,
        active_color: def.active_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GUITAR_STRINGS;

    fn drum_geometry() -> ZoneGeometry {
        ZoneGeometry::new(Catalog::drum_kit())
    }

    #[test]
    fn pad_scale_grows_size_and_keeps_center() {
        let mut geom = drum_geometry();
        let base = geom
            .layout(800.0, 600.0, &InstrumentConfig::default())
            .pads
            .iter()
            .find(|p| p.id == "snare")
            .cloned()
            .unwrap();

        let cfg = InstrumentConfig {
            pad_scale: 1.5,
            ..Default::default()
        };
        let scaled = geom
            .layout(800.0, 600.0, &cfg)
            .pads
            .iter()
            .find(|p| p.id == "snare")
            .cloned()
            .unwrap();

        assert!((scaled.width_px - 180.0).abs() < 1e-3);
        assert!((scaled.height_px - 180.0).abs() < 1e-3);

        // Center stays fixed: position shifted left/up by half the growth
        let base_center_x = base.x_percent / 100.0 * 800.0 + base.width_px / 2.0;
        let scaled_center_x = scaled.x_percent / 100.0 * 800.0 + scaled.width_px / 2.0;
        assert!((base_center_x - scaled_center_x).abs() < 1e-3);
    }

    #[test]
    fn pad_recentering_skipped_without_container() {
        let mut geom = drum_geometry();
        let cfg = InstrumentConfig {
            pad_scale: 2.0,
            ..Default::default()
        };
        let layout = geom.layout(0.0, 0.0, &cfg);
        let snare = layout.pads.iter().find(|p| p.id == "snare").unwrap();
        // Raw pixel size only; percent position untouched
        assert!((snare.width_px - 240.0).abs() < 1e-3);
        assert_eq!(snare.x_percent, 20.0);
    }

    #[test]
    fn disabled_pads_are_excluded() {
        let mut geom = drum_geometry();
        let cfg = InstrumentConfig {
            enabled_pads: Some(vec!["snare".into(), "kick".into()]),
            ..Default::default()
        };
        let layout = geom.layout(800.0, 600.0, &cfg);
        let ids: Vec<_> = layout.pads.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["snare", "kick"]);
    }

    #[test]
    fn strings_anchor_at_two_thirds_height() {
        let rows = string_rows(&GUITAR_STRINGS, 600.0, 0.28, 12.0);
        assert_eq!(rows.len(), 6);
        // Top string sits on the 66% baseline
        assert!((rows[0].y_percent - 66.0).abs() < 1e-3);
        // Evenly spaced across 28% of the height
        let step = rows[1].y_percent - rows[0].y_percent;
        for pair in rows.windows(2) {
            assert!((pair[1].y_percent - pair[0].y_percent - step).abs() < 1e-3);
        }
        let span = rows[5].y_percent - rows[0].y_percent;
        assert!((span - 28.0).abs() < 1e-3);
    }

    #[test]
    fn overflowing_string_stack_is_pulled_up() {
        // Spacing beyond the clamp range, exercised directly
        let rows = string_rows(&GUITAR_STRINGS, 600.0, 0.5, 12.0);
        // usable = 300, baseline 396 would overflow; pulled up to 300
        assert!((rows[0].y_percent - 50.0).abs() < 1e-3);
        assert!((rows[5].y_percent - 100.0).abs() < 1e-3);
    }

    #[test]
    fn zero_height_splits_strings_evenly() {
        let rows = string_rows(&GUITAR_STRINGS, 0.0, 0.28, 12.0);
        assert_eq!(rows[0].y_percent, 0.0);
        assert!((rows[3].y_percent - 60.0).abs() < 1e-3);
        assert_eq!(rows[5].y_percent, 100.0);
    }

    #[test]
    fn fret_and_strum_zones_are_independent() {
        let mut geom = ZoneGeometry::new(Catalog::guitar());

        // Default ratios leave no gap: 0.67 fret, 0.33 strum
        let layout = geom.layout(800.0, 600.0, &InstrumentConfig::default());
        assert!((layout.fret_zone_max_x - 536.0).abs() < 1e-2);
        assert!((layout.strum_zone_min_x - 536.0).abs() < 1e-2);

        // A gap between the sub-zones is preserved
        let cfg = InstrumentConfig {
            fret_zone_width_ratio: 0.4,
            strum_zone_width_ratio: 0.2,
            ..Default::default()
        };
        let layout = geom.layout(800.0, 600.0, &cfg);
        assert!((layout.fret_zone_max_x - 320.0).abs() < 1e-2);
        assert!((layout.strum_zone_min_x - 640.0).abs() < 1e-2);

        // Overlapping ratios collapse the strum edge onto the fret edge
        let cfg = InstrumentConfig {
            fret_zone_width_ratio: 0.9,
            strum_zone_width_ratio: 0.9,
            ..Default::default()
        };
        let layout = geom.layout(800.0, 600.0, &cfg);
        assert!((layout.fret_zone_max_x - 720.0).abs() < 1e-2);
        assert_eq!(layout.strum_zone_min_x, layout.fret_zone_max_x);
    }
}
