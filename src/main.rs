//! Oreoids entry point
//!
//! On the web this installs logging and hands the page over to
//! `platform::web`. Natively it plays one scripted, seeded session without a
//! window and logs what happened.
//!
//! Native usage: `oreoids [seed] [tuning.json]`

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger unavailable: {err}").into());
    }
    log::info!("Oreoids {} starting...", oreoids::consts::GAME_VERSION);
    oreoids::platform::web::start("game")
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Oreoids {} (native, headless) starting...", oreoids::consts::GAME_VERSION);

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => oreoids::Tuning::default(),
    };

    let report = headless::run(seed, tuning);
    println!("{report}");
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> oreoids::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|json| oreoids::Tuning::from_json(&json).map_err(|err| err.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(err) => {
            log::warn!("Ignoring tuning file {}: {}", path, err);
            oreoids::Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fmt;

    use glam::Vec2;
    use oreoids::consts::{DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};
    use oreoids::math::Rect;
    use oreoids::platform::{FrameTime, InputState, Key, MemoryStorage, SoundLog};
    use oreoids::renderer::FrameCollector;
    use oreoids::{SceneKind, SceneManager, Tuning, UpgradeType};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on a flight after this many frames and fly home
    const MAX_FLIGHT_FRAMES: u32 = 60 * 90;

    /// Every key the script may hold
    const SCRIPT_KEYS: [Key; 13] = [
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::ArrowUp,
        Key::Space,
        Key::Enter,
        Key::Escape,
        Key::Digit(1),
        Key::Digit(2),
        Key::Digit(3),
        Key::Digit(4),
        Key::Digit(5),
        Key::Digit(6),
        Key::Digit(7),
    ];

    pub struct Report {
        seed: u64,
        flight_frames: u32,
        ship_lost: bool,
        ore_before_shopping: u64,
        ore_after_shopping: u64,
        levels: Vec<(UpgradeType, u32)>,
        sounds: usize,
        drawables: usize,
    }

    impl fmt::Display for Report {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "seed {}", self.seed)?;
            writeln!(
                f,
                "flight: {} frames, {}",
                self.flight_frames,
                if self.ship_lost { "ship lost" } else { "returned to station" }
            )?;
            writeln!(f, "ore: {} -> {} after shopping", self.ore_before_shopping, self.ore_after_shopping)?;
            for (kind, level) in &self.levels {
                writeln!(f, "  {:<26} lvl {}", kind.name(), level)?;
            }
            write!(f, "{} sounds, {} drawables in the last frame", self.sounds, self.drawables)
        }
    }

    struct Session {
        manager: SceneManager,
        input: InputState,
        frame: FrameTime,
        sounds: SoundLog,
    }

    impl Session {
        /// One frame with exactly `keys` held
        fn step(&mut self, keys: &[Key]) {
            self.frame = self.frame.advance(FRAME_DT);
            self.input.start_frame(&self.frame);
            for key in SCRIPT_KEYS {
                if keys.contains(&key) {
                    self.input.key_down(key);
                } else {
                    self.input.key_up(key);
                }
            }
            self.manager.update(&self.frame, &self.input, &mut self.sounds);
        }

        /// Tap `key` once and let go
        fn tap(&mut self, key: Key) {
            self.step(&[key]);
            self.step(&[]);
        }
    }

    /// Pilot input for one flight frame: sweep the guns while drifting forward
    fn pilot(frame: u32) -> Vec<Key> {
        let mut keys = vec![Key::Space];
        match (frame / 45) % 4 {
            0 => keys.push(Key::ArrowLeft),
            1 => keys.push(Key::ArrowUp),
            2 => keys.push(Key::ArrowRight),
            _ => {}
        }
        keys
    }

    pub fn run(seed: u64, tuning: Tuning) -> Report {
        let view = Rect::new(Vec2::ZERO, Vec2::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT));
        let mut session = Session {
            manager: SceneManager::new(Box::new(MemoryStorage::new()), view, seed, tuning),
            input: InputState::new(),
            frame: FrameTime::default(),
            sounds: SoundLog::default(),
        };

        session.step(&[]);
        session.tap(Key::Enter);

        let mut flight_frames = 0;
        let mut ship_lost = false;
        while session.manager.kind() == SceneKind::Flight && flight_frames < MAX_FLIGHT_FRAMES {
            if let Some(flight) = session.manager.flight() {
                ship_lost = flight.ship.is_destroyed();
            }
            session.step(&pilot(flight_frames));
            flight_frames += 1;
        }
        if session.manager.kind() == SceneKind::Flight {
            log::info!("Flight timed out, heading home");
            session.tap(Key::Escape);
        }
        log::info!("Flight over after {} frames", flight_frames);

        let ore_before_shopping = session.manager.player().ore;
        // Keep buying until nothing is affordable
        loop {
            let ore = session.manager.player().ore;
            for (index, _) in UpgradeType::ALL.iter().enumerate() {
                session.tap(Key::Digit(index as u8 + 1));
            }
            if session.manager.player().ore == ore {
                break;
            }
        }

        let mut sink = FrameCollector::new();
        session.manager.render(&mut sink);

        let player = session.manager.player();
        Report {
            seed,
            flight_frames,
            ship_lost,
            ore_before_shopping,
            ore_after_shopping: player.ore,
            levels: UpgradeType::ALL.iter().map(|&kind| (kind, player.upgrade_level(kind))).collect(),
            sounds: session.sounds.played.len(),
            drawables: sink.objects.len(),
        }
    }
}
