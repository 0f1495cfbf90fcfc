//! Menu widgets: buttons, the navigation bar, stat boxes and the arena frame

use glam::Vec2;

use super::SceneKind;
use crate::consts::TEXT_FONT_SIZE;
use crate::math::Rect;
use crate::platform::{InputState, MouseButton};
use crate::renderer::shapes::{filled_rect, outline_rect, text};
use crate::renderer::{Color, RenderIds, RenderSink};

pub const BUTTON_SIZE: Vec2 = Vec2::new(160.0, 40.0);
pub const STAT_BOX_SIZE: Vec2 = Vec2::new(160.0, 40.0);
const NAV_SPACING: f32 = 10.0;

/// Dimmed label color of stat boxes
pub const LABEL_COLOR: Color = Color::GREY.with_alpha(0.5);
/// Translucent black behind every box
const PANEL_COLOR: Color = Color::BLACK.with_alpha(0.7);

#[derive(Debug, Clone)]
pub struct Button {
    pub label: String,
    pub rect: Rect,
    pub primary_color: Color,
    pub disabled: bool,
    pub selected: bool,
    hovered: bool,
    pressed: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rect: Rect::from_position_size(Vec2::ZERO, BUTTON_SIZE),
            primary_color: Color::GREY,
            disabled: false,
            selected: false,
            hovered: false,
            pressed: false,
        }
    }

    /// Move the top-left corner
    pub fn place(&mut self, position: Vec2) {
        self.rect = Rect::from_position_size(position, self.rect.size());
    }

    /// Track hover/press; true when clicked this frame
    pub fn update(&mut self, input: &InputState) -> bool {
        self.hovered = input.mouse_position().is_some_and(|p| self.rect.contains(p));
        let left = input.mouse_button(MouseButton::Left);
        self.pressed = self.hovered && left.is_pressed();
        self.hovered && left.was_pressed_this_frame() && !self.disabled
    }

    pub fn color(&self) -> Color {
        if self.disabled {
            Color::DISABLED_RED
        } else if self.selected {
            Color::ROCK_BLUE
        } else if self.pressed {
            Color::PRESSED_GREY
        } else if self.hovered {
            self.primary_color
        } else {
            self.primary_color.with_alpha(0.5)
        }
    }

    pub fn render(&self, ids: &mut RenderIds, sink: &mut dyn RenderSink) {
        let color = self.color();
        sink.submit(filled_rect(ids.next_id(), self.rect, PANEL_COLOR));
        sink.submit(outline_rect(ids.next_id(), self.rect, 1.0, color));
        sink.submit(text(ids.next_id(), self.rect.center(), &self.label, TEXT_FONT_SIZE, color));
    }
}

/// "Main Menu" / "Station" buttons shown on both menu screens
#[derive(Debug, Clone)]
pub struct NavigationBar {
    main_menu: Button,
    station: Button,
}

impl NavigationBar {
    pub fn new(current: SceneKind) -> Self {
        let mut main_menu = Button::new("Main Menu");
        let mut station = Button::new("Station");
        main_menu.selected = current == SceneKind::MainMenu;
        station.selected = current == SceneKind::Station;
        Self { main_menu, station }
    }

    pub fn place(&mut self, position: Vec2) {
        self.main_menu.place(position);
        self.station.place(position + Vec2::new(BUTTON_SIZE.x + NAV_SPACING, 0.0));
    }

    /// The screen the player navigated to, if any
    pub fn update(&mut self, input: &InputState) -> Option<SceneKind> {
        let to_menu = self.main_menu.update(input) && !self.main_menu.selected;
        let to_station = self.station.update(input) && !self.station.selected;
        if to_menu {
            Some(SceneKind::MainMenu)
        } else if to_station {
            Some(SceneKind::Station)
        } else {
            None
        }
    }

    pub fn render(&self, ids: &mut RenderIds, sink: &mut dyn RenderSink) {
        self.main_menu.render(ids, sink);
        self.station.render(ids, sink);
    }
}

/// Labelled value in a box, label left and value right
pub fn stat_box(
    ids: &mut RenderIds,
    sink: &mut dyn RenderSink,
    rect: Rect,
    label: (&str, Color),
    value: (&str, Color),
) {
    let y = rect.center().y;
    sink.submit(filled_rect(ids.next_id(), rect, PANEL_COLOR));
    sink.submit(outline_rect(ids.next_id(), rect, 1.0, LABEL_COLOR));
    sink.submit(
        text(ids.next_id(), Vec2::new(rect.min.x + 10.0, y), label.0, TEXT_FONT_SIZE, label.1)
            .with_pivot(Vec2::new(0.0, 0.5)),
    );
    sink.submit(
        text(ids.next_id(), Vec2::new(rect.max.x - 10.0, y), value.0, TEXT_FONT_SIZE, value.1)
            .with_pivot(Vec2::new(1.0, 0.5)),
    );
}

/// Black margins around `bounds` plus a thin outline on its edge
pub fn arena_frame(ids: &mut RenderIds, sink: &mut dyn RenderSink, view: Rect, bounds: Rect) {
    let margins = [
        Rect::new(view.min, Vec2::new(view.max.x, bounds.min.y)),
        Rect::new(Vec2::new(view.min.x, bounds.max.y), view.max),
        Rect::new(Vec2::new(view.min.x, bounds.min.y), Vec2::new(bounds.min.x, bounds.max.y)),
        Rect::new(Vec2::new(bounds.max.x, bounds.min.y), Vec2::new(view.max.x, bounds.max.y)),
    ];
    for margin in margins {
        sink.submit(filled_rect(ids.next_id(), margin, Color::BLACK));
    }
    sink.submit(outline_rect(ids.next_id(), bounds, 1.0, Color::GREY));
}
