//! Upgrade shop between flights

use glam::Vec2;

use super::widgets::{BUTTON_SIZE, Button, LABEL_COLOR, NavigationBar, STAT_BOX_SIZE, arena_frame, stat_box};
use super::{SceneContext, SceneKind};
use crate::audio::{SoundEffect, SoundRequest};
use crate::consts::TEXT_FONT_SIZE;
use crate::math::Rect;
use crate::platform::Key;
use crate::progression::{PlayerData, UpgradeType};
use crate::renderer::shapes::text;
use crate::renderer::{Color, RenderIds, RenderLayer, RenderSink};

const MARGIN: f32 = 20.0;
const ROW_SIZE: Vec2 = Vec2::new(800.0, 40.0);
const ROW_SPACING: f32 = 20.0;
/// Top of the first upgrade row
const ROWS_TOP: f32 = 240.0;

/// One line of the shop: name and level on the left, buy button on the right
#[derive(Debug, Clone)]
struct UpgradeRow {
    kind: UpgradeType,
    rect: Rect,
    buy: Button,
}

impl UpgradeRow {
    fn new(kind: UpgradeType, position: Vec2) -> Self {
        let mut buy = Button::new("");
        buy.primary_color = Color::UPGRADE_GREEN;
        buy.place(position + Vec2::new(ROW_SIZE.x - BUTTON_SIZE.x, 0.0));
        Self {
            kind,
            rect: Rect::from_position_size(position, ROW_SIZE),
            buy,
        }
    }

    /// Refresh the button from the player's wallet; true when clicked
    fn update(&mut self, ctx: &SceneContext) -> bool {
        self.buy.label = format!("{} ORE", ctx.player.next_upgrade_cost(self.kind));
        self.buy.disabled = !ctx.player.can_afford(self.kind);
        self.buy.update(ctx.input)
    }

    fn render(&self, player: &PlayerData, ids: &mut RenderIds, sink: &mut dyn RenderSink) {
        let info = Rect::from_position_size(self.rect.min, ROW_SIZE - Vec2::new(BUTTON_SIZE.x + 10.0, 0.0));
        let level = format!("lvl {}", player.upgrade_level(self.kind));
        stat_box(
            ids,
            sink,
            info,
            (self.kind.name(), Color::GREY),
            (level.as_str(), Color::ROCK_BLUE),
        );
        self.buy.render(ids, sink);
    }
}

pub struct StationScene {
    view: Rect,
    bounds: Rect,
    navigation: NavigationBar,
    rows: Vec<UpgradeRow>,
}

impl StationScene {
    pub fn new(view: Rect) -> Self {
        let bounds = view.inset_edges(MARGIN, MARGIN, MARGIN, MARGIN);
        let mut navigation = NavigationBar::new(SceneKind::Station);
        navigation.place(bounds.min + Vec2::splat(MARGIN));

        let mut position = Vec2::new(bounds.center().x - ROW_SIZE.x * 0.5, ROWS_TOP);
        let rows = UpgradeType::ALL
            .iter()
            .map(|&kind| {
                let row = UpgradeRow::new(kind, position);
                position.y += ROW_SIZE.y + ROW_SPACING;
                row
            })
            .collect();

        Self {
            view,
            bounds,
            navigation,
            rows,
        }
    }

    pub fn update(&mut self, ctx: &mut SceneContext) -> Option<SceneKind> {
        let input = ctx.input;
        if let Some(next) = self.navigation.update(input) {
            return Some(next);
        }
        if input.key(Key::Tab).was_pressed_this_frame() {
            return Some(SceneKind::MainMenu);
        }
        if input.key(Key::Enter).was_pressed_this_frame() {
            return Some(SceneKind::Flight);
        }

        for (index, row) in self.rows.iter_mut().enumerate() {
            let hotkey = Key::Digit(index as u8 + 1);
            if row.update(ctx) || input.key(hotkey).was_pressed_this_frame() {
                buy_upgrade(ctx, row.kind);
            }
        }
        None
    }

    pub fn render(&self, player: &PlayerData, sink: &mut dyn RenderSink) {
        let mut ids = RenderIds::new(RenderLayer::Menu);
        arena_frame(&mut RenderIds::new(RenderLayer::Arena), sink, self.view, self.bounds);
        self.navigation.render(&mut ids, sink);

        let first = self.rows.first().map_or(Vec2::new(0.0, ROWS_TOP), |row| row.rect.min);
        let header_y = first.y - STAT_BOX_SIZE.y - ROW_SPACING;
        let upgrades = Rect::from_position_size(
            Vec2::new(first.x, header_y),
            Vec2::new(ROW_SIZE.x - BUTTON_SIZE.x - 10.0, STAT_BOX_SIZE.y),
        );
        stat_box(&mut ids, sink, upgrades, ("UPGRADES", LABEL_COLOR), ("", Color::GREY));
        let ore = Rect::from_position_size(
            Vec2::new(first.x + ROW_SIZE.x - STAT_BOX_SIZE.x, header_y),
            STAT_BOX_SIZE,
        );
        let wallet = player.ore.to_string();
        stat_box(&mut ids, sink, ore, ("ORE", LABEL_COLOR), (wallet.as_str(), Color::GREY));

        for row in &self.rows {
            row.render(player, &mut ids, sink);
        }

        sink.submit(text(
            ids.next_id(),
            self.bounds.center() + Vec2::new(0.0, 360.0),
            "Press [Enter] to go fly.",
            TEXT_FONT_SIZE,
            Color::GREY,
        ));
    }
}

fn buy_upgrade(ctx: &mut SceneContext, kind: UpgradeType) {
    if ctx.player.try_purchase(kind).is_some() {
        ctx.sounds.play(&SoundRequest::new(SoundEffect::Upgrade).with_pitch_variance(0.0));
    } else {
        log::debug!("cannot afford {} ({} ore)", kind.name(), ctx.player.ore);
    }
}
