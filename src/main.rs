//! Airband entry point
//!
//! The library is the product; this binary is a scripted native demo that
//! drives both instruments with synthetic hand frames so the engine and the
//! audio path can be heard without a camera.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::thread::sleep;
    use std::time::Duration;

    use airband::consts::HAND_LANDMARKS;
    use airband::{Catalog, FingerClass, Hand, Instrument, InstrumentConfig, Landmark};

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    const FRAME_MS: f64 = 33.0;

    fn hand_at(x: f32, y: f32) -> Hand {
        let mut hand = [Landmark {
            x: 0.02,
            y: 0.02,
            z: 0.0,
            visibility: 1.0,
        }; HAND_LANDMARKS];
        hand[FingerClass::Index.landmark_index()] = Landmark {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        };
        hand
    }

    /// Normalized point that mirrors onto the center of a pad
    fn over_pad(instrument: &mut Instrument, id: &str) -> (f32, f32) {
        let layout = instrument.layout();
        let pad = layout
            .pads
            .iter()
            .find(|p| p.id == id)
            .unwrap_or_else(|| panic!("no pad {id}"));
        let cx = pad.x_percent / 100.0 * WIDTH + pad.width_px / 2.0;
        let cy = pad.y_percent / 100.0 * HEIGHT + pad.height_px / 2.0;
        (1.0 - cx / WIDTH, cy / HEIGHT)
    }

    /// Run a strike-release cycle on each listed target
    fn play(instrument: &mut Instrument, targets: &[(f32, f32)], start_ms: f64) -> f64 {
        let mut now = start_ms;
        for &(x, y) in targets {
            for hand in [hand_at(x, y), hand_at(0.02, 0.02)] {
                instrument.process_frame(Some(&[hand]), now);
                now += 4.0 * FRAME_MS;
                sleep(Duration::from_millis(4 * FRAME_MS as u64));
            }
        }
        now
    }

    /// Settings come from the file named by AIRBAND_CONFIG, when set
    fn load_config() -> InstrumentConfig {
        let Ok(path) = std::env::var("AIRBAND_CONFIG") else {
            return InstrumentConfig::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match InstrumentConfig::from_json(&json) {
                Ok(cfg) => cfg,
                Err(err) => {
                    log::warn!("invalid config {path}: {err}");
                    InstrumentConfig::default()
                }
            },
            Err(err) => {
                log::warn!("cannot read config {path}: {err}");
                InstrumentConfig::default()
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Airband demo starting");
        let config = load_config();
        if let Ok(json) = config.to_json() {
            log::debug!("config: {json}");
        }

        let mut drums = Instrument::new(Catalog::drum_kit(), config.clone());
        drums.set_container_size(WIDTH, HEIGHT);
        drums.set_on_hit(|zone| log::info!("hit {zone}"));
        if !drums.has_audio_output() {
            log::warn!("running silent (no audio device)");
        }

        let pattern = ["kick", "hihat", "snare", "hihat", "kick", "crash"];
        let targets: Vec<_> = pattern
            .iter()
            .map(|id| over_pad(&mut drums, id))
            .collect();
        let mut now = play(&mut drums, &targets, 0.0);
        log::info!(
            "drums: {} hits, combo {}, tempo {:?}",
            drums.hits(),
            drums.combo(now),
            drums.tempo_bpm()
        );
        drums.shutdown();

        let mut guitar = Instrument::new(Catalog::guitar(), config);
        guitar.set_container_size(WIDTH, HEIGHT);
        guitar.set_on_hit(|zone| log::info!("pluck {zone}"));

        let layout = guitar.layout();
        let strum_x = (layout.strum_zone_min_x + WIDTH) / 2.0;
        let targets: Vec<_> = layout
            .strings
            .iter()
            .map(|s| (1.0 - strum_x / WIDTH, s.y_percent / 100.0))
            .collect();
        now = play(&mut guitar, &targets, now);
        log::info!(
            "guitar: {} hits, combo {}, tempo {:?}",
            guitar.hits(),
            guitar.combo(now),
            guitar.tempo_bpm()
        );
        guitar.shutdown();

        // Let the last voices ring out before the stream drops
        sleep(Duration::from_millis(400));
        log::info!("Airband demo done");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // On wasm the host page drives the library through its bindings;
    // there is nothing to run from a main function.
}
