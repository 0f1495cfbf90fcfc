//! Drawable builders for common 2D primitives

use glam::Vec2;

use super::{Color, RenderData, RenderId, RenderObject};
use crate::math::{Rect, Transform2D, inverse_lerp};

/// Text block centered at `position`
pub fn text(id: RenderId, position: Vec2, text: &str, font_size: f32, color: Color) -> RenderObject {
    RenderObject::new(
        id,
        Transform2D::from_translation(position),
        color,
        RenderData::Text {
            text: text.to_string(),
            font_size,
        },
    )
}

/// Filled rectangle covering `rect`
pub fn filled_rect(id: RenderId, rect: Rect, color: Color) -> RenderObject {
    RenderObject::new(
        id,
        Transform2D::from_translation(rect.center()),
        color,
        RenderData::Rectangle {
            width: rect.width(),
            height: rect.height(),
            corner_radius: None,
            stroke_width: None,
        },
    )
}

/// Outline of `rect` with the given stroke
pub fn outline_rect(id: RenderId, rect: Rect, stroke_width: f32, color: Color) -> RenderObject {
    RenderObject::new(
        id,
        Transform2D::from_translation(rect.center()),
        color,
        RenderData::Rectangle {
            width: rect.width(),
            height: rect.height(),
            corner_radius: None,
            stroke_width: Some(stroke_width),
        },
    )
}

/// Red-to-base fade after a hit; fully faded once `time_since_hit >= duration`
pub fn hit_flash_color(base: Color, time_since_hit: f32, duration: f32) -> Color {
    Color::lerp(Color::FLASH_RED, base, time_since_hit / duration)
}

/// Grey while plenty is left, sliding to red as `value` approaches zero
pub fn low_value_color(value: f32, warn_below: f32) -> Color {
    Color::lerp(Color::GREY, Color::FLASH_RED, inverse_lerp(warn_below, 0.0, value))
}
