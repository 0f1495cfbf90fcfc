//! Title screen

use glam::Vec2;

use super::widgets::{BUTTON_SIZE, Button, NavigationBar, arena_frame};
use super::{SceneContext, SceneKind};
use crate::consts::{GAME_VERSION, SMALL_FONT_SIZE, TEXT_FONT_SIZE};
use crate::math::Rect;
use crate::platform::Key;
use crate::renderer::shapes::text;
use crate::renderer::{Color, RenderIds, RenderLayer, RenderSink};

const MARGIN: f32 = 20.0;

const TITLE_ART: &str = "\
\x20██████╗ ██████╗ ███████╗ ██████╗ ██╗██████╗ ███████╗\n\
██╔═══██╗██╔══██╗██╔════╝██╔═══██╗██║██╔══██╗██╔════╝\n\
██║   ██║██████╔╝█████╗  ██║   ██║██║██║  ██║███████╗\n\
██║   ██║██╔══██╗██╔══╝  ██║   ██║██║██║  ██║╚════██║\n\
╚██████╔╝██║  ██║███████╗╚██████╔╝██║██████╔╝███████║\n\
\x20╚═════╝ ╚═╝  ╚═╝╚══════╝ ╚═════╝ ╚═╝╚═════╝ ╚══════╝";

const PROMPT: &str = "Maneuver with [Arrow Keys], fire with [Space], press [Enter] to go fly.";
const CONFIRM_CLEAR: &str = "Press [Y] to confirm deletion of all player data. Press [Escape] to cancel.";

pub struct MainMenuScene {
    view: Rect,
    bounds: Rect,
    navigation: NavigationBar,
    clear_data: Button,
    has_player_data: bool,
    clearing_data: bool,
}

impl MainMenuScene {
    pub fn new(view: Rect) -> Self {
        Self {
            view,
            bounds: view.inset_edges(MARGIN, MARGIN, MARGIN, MARGIN),
            navigation: NavigationBar::new(SceneKind::MainMenu),
            clear_data: Button::new("Clear Data"),
            has_player_data: false,
            clearing_data: false,
        }
    }

    /// Waiting for the player to confirm wiping their progress
    pub fn is_clearing_data(&self) -> bool {
        self.clearing_data
    }

    pub fn update(&mut self, ctx: &mut SceneContext) -> Option<SceneKind> {
        let input = ctx.input;
        self.has_player_data = ctx.player.has_any_data();

        if self.has_player_data {
            self.clear_data.place(Vec2::new(
                self.bounds.max.x - BUTTON_SIZE.x - MARGIN,
                self.bounds.min.y + MARGIN,
            ));
            if self.clear_data.update(input) || input.key(Key::KeyC).was_pressed_this_frame() {
                self.clearing_data = true;
            }
        }

        if self.clearing_data {
            if input.key(Key::KeyY).was_pressed_this_frame() {
                self.clearing_data = false;
                ctx.player.clear();
                ctx.player.save(ctx.storage);
                self.has_player_data = false;
                log::info!("Player data cleared");
            } else if input.key(Key::Escape).was_pressed_this_frame() {
                self.clearing_data = false;
            }
            return None;
        }

        if self.has_player_data {
            self.navigation.place(self.bounds.min + Vec2::splat(MARGIN));
            if let Some(next) = self.navigation.update(input) {
                return Some(next);
            }
            if input.key(Key::Tab).was_pressed_this_frame() {
                return Some(SceneKind::Station);
            }
        }

        if input.key(Key::Enter).was_pressed_this_frame() {
            return Some(SceneKind::Flight);
        }
        None
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        let mut ids = RenderIds::new(RenderLayer::Menu);
        arena_frame(&mut RenderIds::new(RenderLayer::Arena), sink, self.view, self.bounds);
        if self.has_player_data {
            self.navigation.render(&mut ids, sink);
            self.clear_data.render(&mut ids, sink);
        }

        let title_position = self.bounds.center() + Vec2::new(0.0, -120.0);
        sink.submit(
            text(ids.next_id(), title_position, TITLE_ART, TEXT_FONT_SIZE, Color::GREY).with_pivot(Vec2::new(0.5, 1.0)),
        );
        sink.submit(
            text(
                ids.next_id(),
                title_position + Vec2::new(400.0, 4.0),
                GAME_VERSION,
                SMALL_FONT_SIZE,
                Color::GREY,
            )
            .with_pivot(Vec2::new(1.0, 0.0)),
        );

        let prompt = if self.clearing_data { CONFIRM_CLEAR } else { PROMPT };
        sink.submit(text(
            ids.next_id(),
            self.bounds.center() + Vec2::new(0.0, 120.0),
            prompt,
            TEXT_FONT_SIZE,
            Color::GREY,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FrameTime, InputState, MemoryStorage, MouseButton, SoundLog, Storage};
    use crate::progression::PlayerData;
    use crate::renderer::FrameCollector;

    struct Harness {
        frame: FrameTime,
        input: InputState,
        player: PlayerData,
        storage: MemoryStorage,
        sounds: SoundLog,
    }

    impl Harness {
        fn new(player: PlayerData) -> Self {
            Self {
                frame: FrameTime::default(),
                input: InputState::new(),
                player,
                storage: MemoryStorage::new(),
                sounds: SoundLog::default(),
            }
        }

        /// One frame with `key` freshly pressed
        fn press(&mut self, scene: &mut MainMenuScene, key: Option<Key>) -> Option<SceneKind> {
            self.frame = self.frame.advance(1.0 / 60.0);
            self.input.start_frame(&self.frame);
            self.input.release_all();
            if let Some(key) = key {
                self.input.key_down(key);
            }
            self.run(scene)
        }

        fn run(&mut self, scene: &mut MainMenuScene) -> Option<SceneKind> {
            let mut ctx = SceneContext {
                frame: self.frame,
                input: &self.input,
                player: &mut self.player,
                storage: &mut self.storage,
                sounds: &mut self.sounds,
            };
            scene.update(&mut ctx)
        }
    }

    fn view() -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(1280.0, 800.0))
    }

    fn veteran() -> PlayerData {
        let mut player = PlayerData::default();
        player.add_ore(42);
        player
    }

    #[test]
    fn test_enter_starts_flight() {
        let mut harness = Harness::new(PlayerData::default());
        let mut scene = MainMenuScene::new(view());
        assert_eq!(harness.press(&mut scene, None), None);
        assert_eq!(harness.press(&mut scene, Some(Key::Enter)), Some(SceneKind::Flight));
    }

    #[test]
    fn test_new_player_sees_no_navigation() {
        let mut harness = Harness::new(PlayerData::default());
        let mut scene = MainMenuScene::new(view());
        assert_eq!(harness.press(&mut scene, Some(Key::Tab)), None);

        let mut sink = FrameCollector::new();
        scene.render(&mut sink);
        assert!(sink.has_text("██████"));
        assert!(sink.has_text(GAME_VERSION));
        assert!(sink.has_text("press [Enter] to go fly"));
        assert!(!sink.has_text("Station"));
        assert!(!sink.has_text("Clear Data"));
    }

    #[test]
    fn test_navigate_to_station() {
        let mut harness = Harness::new(veteran());
        let mut scene = MainMenuScene::new(view());
        assert_eq!(harness.press(&mut scene, Some(Key::Tab)), Some(SceneKind::Station));

        let mut sink = FrameCollector::new();
        scene.render(&mut sink);
        assert!(sink.has_text("Station"));
        assert!(sink.has_text("Clear Data"));

        // Station button sits right of "Main Menu" in the top-left corner
        harness.frame = harness.frame.advance(1.0 / 60.0);
        harness.input.start_frame(&harness.frame);
        harness.input.mouse_down(MouseButton::Left, Vec2::new(20.0 + 20.0 + 170.0 + 5.0, 60.0));
        assert_eq!(harness.run(&mut scene), Some(SceneKind::Station));
    }

    #[test]
    fn test_clear_data_can_be_cancelled() {
        let mut harness = Harness::new(veteran());
        let mut scene = MainMenuScene::new(view());
        harness.press(&mut scene, Some(Key::KeyC));
        assert!(scene.is_clearing_data());

        let mut sink = FrameCollector::new();
        scene.render(&mut sink);
        assert!(sink.has_text("Press [Y] to confirm"));

        // Enter does nothing while confirming
        assert_eq!(harness.press(&mut scene, Some(Key::Enter)), None);
        harness.press(&mut scene, Some(Key::Escape));
        assert!(!scene.is_clearing_data());
        assert_eq!(harness.player.ore, 42);
    }

    #[test]
    fn test_clear_data_confirmed() {
        let mut harness = Harness::new(veteran());
        let mut scene = MainMenuScene::new(view());

        // Clear Data button in the top-right corner
        harness.frame = harness.frame.advance(1.0 / 60.0);
        harness.input.start_frame(&harness.frame);
        harness.input.mouse_down(MouseButton::Left, Vec2::new(1280.0 - 40.0 - 80.0, 60.0));
        harness.run(&mut scene);
        assert!(scene.is_clearing_data());

        harness.press(&mut scene, Some(Key::KeyY));
        assert!(!scene.is_clearing_data());
        assert!(!harness.player.has_any_data());
        let saved = harness.storage.load(PlayerData::STORAGE_KEY);
        assert_eq!(saved.map(|json| PlayerData::from_json(&json).ok()), Some(Some(PlayerData::default())));
    }
}
