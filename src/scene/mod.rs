//! Screen state machine
//!
//! Main menu, station and flight. Exactly one scene is live at a time; the
//! flight's entities are dropped when it ends. Player progression is loaded
//! once and saved on every transition.

pub mod flight;
pub mod menu;
pub mod station;
pub mod widgets;

pub use flight::FlightScene;
pub use menu::MainMenuScene;
pub use station::StationScene;

use glam::Vec2;

use crate::consts::SMALL_FONT_SIZE;
use crate::math::Rect;
use crate::platform::{FrameTime, InputState, SoundSink, Storage};
use crate::progression::PlayerData;
use crate::renderer::shapes::text;
use crate::renderer::{Color, RenderId, RenderLayer, RenderSink};
use crate::settings::Settings;
use crate::sim::FlightState;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    MainMenu,
    Station,
    Flight,
}

/// Everything a scene may touch during one update
pub struct SceneContext<'a> {
    pub frame: FrameTime,
    pub input: &'a InputState,
    pub player: &'a mut PlayerData,
    pub storage: &'a mut dyn Storage,
    pub sounds: &'a mut dyn SoundSink,
}

enum Scene {
    MainMenu(MainMenuScene),
    Station(StationScene),
    Flight(Box<FlightScene>),
}

/// Frame rate over the last 60 frames
#[derive(Debug, Clone)]
struct FpsCounter {
    frame_times: [f64; 60],
    index: usize,
    fps: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frame_times: [0.0; 60],
            index: 0,
            fps: 0,
        }
    }

    fn record(&mut self, elapsed: f64) {
        self.frame_times[self.index] = elapsed;
        self.index = (self.index + 1) % self.frame_times.len();
        // The slot just past the newest holds the oldest sample
        let oldest = self.frame_times[self.index];
        let span = elapsed - oldest;
        if oldest > 0.0 && span > 0.0 {
            self.fps = ((self.frame_times.len() - 1) as f64 / span).round() as u32;
        }
    }
}

pub struct SceneManager {
    view: Rect,
    tuning: Tuning,
    settings: Settings,
    storage: Box<dyn Storage>,
    player: PlayerData,
    scene: Scene,
    seed: u64,
    flights_launched: u64,
    fps: FpsCounter,
}

impl SceneManager {
    /// Load progression and settings, then open the main menu
    ///
    /// Each flight is seeded from `seed` and the number of flights before it.
    pub fn new(storage: Box<dyn Storage>, view: Rect, seed: u64, tuning: Tuning) -> Self {
        let player = PlayerData::load(storage.as_ref());
        let settings = Settings::load(storage.as_ref());
        Self {
            view,
            tuning,
            settings,
            storage,
            player,
            scene: Scene::MainMenu(MainMenuScene::new(view)),
            seed,
            flights_launched: 0,
            fps: FpsCounter::new(),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self.scene {
            Scene::MainMenu(_) => SceneKind::MainMenu,
            Scene::Station(_) => SceneKind::Station,
            Scene::Flight(_) => SceneKind::Flight,
        }
    }

    pub fn player(&self) -> &PlayerData {
        &self.player
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace and persist the player's preferences
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings.save(self.storage.as_mut());
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// The running flight, if any
    pub fn flight(&self) -> Option<&FlightState> {
        match &self.scene {
            Scene::Flight(flight) => Some(flight.state()),
            _ => None,
        }
    }

    /// One frame of the current scene, switching scenes if it asks to
    pub fn update(&mut self, frame: &FrameTime, input: &InputState, sounds: &mut dyn SoundSink) {
        self.fps.record(frame.elapsed);

        let mut ctx = SceneContext {
            frame: *frame,
            input,
            player: &mut self.player,
            storage: self.storage.as_mut(),
            sounds,
        };
        let next = match &mut self.scene {
            Scene::MainMenu(scene) => scene.update(&mut ctx),
            Scene::Station(scene) => scene.update(&mut ctx),
            Scene::Flight(scene) => scene.update(&mut ctx),
        };

        if let Some(kind) = next {
            self.go_to(kind);
        }
    }

    pub fn go_to(&mut self, kind: SceneKind) {
        self.player.save(self.storage.as_mut());
        self.scene = match kind {
            SceneKind::MainMenu => Scene::MainMenu(MainMenuScene::new(self.view)),
            SceneKind::Station => Scene::Station(StationScene::new(self.view)),
            SceneKind::Flight => {
                let seed = self.seed.wrapping_add(self.flights_launched);
                self.flights_launched += 1;
                let flight = FlightScene::new(seed, self.view, &self.player, self.tuning.clone());
                Scene::Flight(Box::new(flight))
            }
        };
        log::info!("Scene -> {:?}", kind);
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        match &self.scene {
            Scene::MainMenu(scene) => scene.render(sink),
            Scene::Station(scene) => scene.render(&self.player, sink),
            Scene::Flight(scene) => scene.render(&self.player, sink),
        }

        if self.settings.show_fps {
            sink.submit(
                text(
                    RenderId::new(RenderLayer::Hud, u32::MAX),
                    Vec2::new(self.view.max.x - 4.0, self.view.min.y + 2.0),
                    &format!("{} FPS", self.fps.fps),
                    SMALL_FONT_SIZE,
                    Color::DIM_GREY,
                )
                .with_pivot(Vec2::new(1.0, 0.0)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Key, MemoryStorage, SoundLog};
    use crate::renderer::FrameCollector;

    fn view() -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(1280.0, 800.0))
    }

    struct Driver {
        manager: SceneManager,
        frame: FrameTime,
        input: InputState,
        sounds: SoundLog,
    }

    impl Driver {
        fn new(storage: MemoryStorage) -> Self {
            Self {
                manager: SceneManager::new(Box::new(storage), view(), 7, Tuning::default()),
                frame: FrameTime::default(),
                input: InputState::new(),
                sounds: SoundLog::default(),
            }
        }

        /// One 60 Hz frame with only `keys` held (freshly pressed if new)
        fn frame(&mut self, keys: &[Key]) {
            self.frame = self.frame.advance(1.0 / 60.0);
            self.input.start_frame(&self.frame);
            for key in [Key::Enter, Key::Escape, Key::Tab, Key::Space] {
                if !keys.contains(&key) {
                    self.input.key_up(key);
                }
            }
            for key in keys {
                self.input.key_down(*key);
            }
            self.manager.update(&self.frame, &self.input, &mut self.sounds);
        }
    }

    fn stored_player(ore: u64) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        let mut player = PlayerData::default();
        player.add_ore(ore);
        player.save(&mut storage);
        storage
    }

    #[test]
    fn test_loads_player_on_start() {
        let driver = Driver::new(stored_player(42));
        assert_eq!(driver.manager.kind(), SceneKind::MainMenu);
        assert_eq!(driver.manager.player().ore, 42);
        assert!(driver.manager.flight().is_none());
    }

    #[test]
    fn test_corrupt_save_falls_back_to_defaults() {
        let mut storage = MemoryStorage::new();
        storage.save(PlayerData::STORAGE_KEY, "{not json");
        storage.save(Settings::STORAGE_KEY, "[]");
        let driver = Driver::new(storage);
        assert_eq!(driver.manager.player(), &PlayerData::default());
        assert_eq!(driver.manager.settings(), &Settings::default());
    }

    #[test]
    fn test_menu_to_flight_to_station() {
        let mut driver = Driver::new(stored_player(5));
        driver.frame(&[]);
        driver.frame(&[Key::Enter]);
        assert_eq!(driver.manager.kind(), SceneKind::Flight);
        assert!(driver.manager.flight().is_some());

        driver.frame(&[]);
        assert_eq!(driver.manager.flight().map(|f| f.time_ticks), Some(2));

        driver.frame(&[Key::Escape]);
        assert_eq!(driver.manager.kind(), SceneKind::Station);
        assert!(driver.manager.flight().is_none());

        let saved = driver.manager.storage().load(PlayerData::STORAGE_KEY);
        let saved = saved.and_then(|json| PlayerData::from_json(&json).ok());
        assert_eq!(saved.as_ref(), Some(driver.manager.player()));

        // Station -> menu -> station by keyboard
        driver.frame(&[Key::Tab]);
        assert_eq!(driver.manager.kind(), SceneKind::MainMenu);
        driver.frame(&[]);
        driver.frame(&[Key::Tab]);
        assert_eq!(driver.manager.kind(), SceneKind::Station);
    }

    #[test]
    fn test_zero_level_save_still_launches() {
        let mut storage = MemoryStorage::new();
        storage.save(PlayerData::STORAGE_KEY, r#"{"upgrades":[{"type":"DangerLevel","level":0}]}"#);
        let mut driver = Driver::new(storage);
        driver.frame(&[]);
        driver.frame(&[Key::Enter]);
        assert_eq!(driver.manager.kind(), SceneKind::Flight);
        driver.frame(&[]);
        assert_eq!(driver.manager.flight().map(|f| f.time_ticks), Some(2));
    }

    #[test]
    fn test_lost_ship_returns_to_station() {
        let mut driver = Driver::new(MemoryStorage::new());
        driver.manager.go_to(SceneKind::Flight);
        if let Scene::Flight(flight) = &mut driver.manager.scene {
            flight.state_mut().ship.health = 0.0;
        }
        for _ in 0..90 {
            driver.frame(&[]);
        }
        assert_eq!(driver.manager.kind(), SceneKind::Station);
        assert!(driver.sounds.played.iter().any(|r| r.effect == crate::audio::SoundEffect::Death));
    }

    #[test]
    fn test_each_flight_gets_its_own_seed() {
        let mut driver = Driver::new(MemoryStorage::new());
        driver.manager.go_to(SceneKind::Flight);
        let first = driver.manager.flight().map(|f| f.seed);
        driver.manager.go_to(SceneKind::Flight);
        let second = driver.manager.flight().map(|f| f.seed);
        assert_eq!(first, Some(7));
        assert_eq!(second, Some(8));
    }

    #[test]
    fn test_render_follows_scene() {
        let mut driver = Driver::new(MemoryStorage::new());
        let mut sink = FrameCollector::new();
        driver.manager.render(&mut sink);
        assert!(sink.has_text("press [Enter] to go fly"));
        assert!(!sink.has_text("FPS"));

        driver.manager.go_to(SceneKind::Station);
        sink.clear();
        driver.manager.render(&mut sink);
        assert!(sink.has_text("UPGRADES"));

        driver.manager.go_to(SceneKind::Flight);
        sink.clear();
        driver.manager.render(&mut sink);
        assert!(sink.has_text("HULL"));
        assert_eq!(sink.count_layer(RenderLayer::Asteroid), 10);
    }

    #[test]
    fn test_settings_persist_and_show_fps() {
        let mut driver = Driver::new(MemoryStorage::new());
        let settings = Settings {
            show_fps: true,
            ..Settings::default()
        };
        driver.manager.set_settings(settings.clone());
        let stored = driver.manager.storage().load(Settings::STORAGE_KEY);
        assert_eq!(stored.and_then(|json| Settings::from_json(&json).ok()), Some(settings));

        for _ in 0..61 {
            driver.frame(&[]);
        }
        let mut sink = FrameCollector::new();
        driver.manager.render(&mut sink);
        assert!(sink.has_text("60 FPS"));
    }
}
