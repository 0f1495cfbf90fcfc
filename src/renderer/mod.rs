//! Drawable descriptors handed to the presentation layer
//!
//! The simulation never talks to the DOM. Each frame it emits `RenderObject`s
//! into a `RenderSink`; the sink keeps a `RenderRegistry` keyed by `RenderId`
//! and drops anything that was not re-submitted.

pub mod color;
pub mod registry;
pub mod shapes;

pub use color::Color;
pub use registry::RenderRegistry;

use glam::Vec2;

use crate::math::Transform2D;

/// Namespace for render ids so different entity kinds never collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RenderLayer {
    Background = 1,
    Asteroid = 2,
    Ship = 3,
    Projectile = 4,
    Particle = 5,
    Arena = 6,
    Hud = 7,
    Menu = 8,
}

/// Stable identity of a drawable across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderId(u64);

impl RenderId {
    pub const fn new(layer: RenderLayer, index: u32) -> Self {
        Self(((layer as u64) << 32) | index as u64)
    }

    pub fn layer_bits(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn index(self) -> u32 {
        self.0 as u32
    }
}

/// Hands out consecutive ids within one layer
///
/// UI elements without an identity of their own get ids in emission order,
/// which stays stable as long as the same elements are drawn each frame.
#[derive(Debug, Clone)]
pub struct RenderIds {
    layer: RenderLayer,
    next: u32,
}

impl RenderIds {
    pub fn new(layer: RenderLayer) -> Self {
        Self { layer, next: 0 }
    }

    pub fn next_id(&mut self) -> RenderId {
        let id = RenderId::new(self.layer, self.next);
        self.next += 1;
        id
    }
}

/// Visual payload of a drawable
#[derive(Debug, Clone, PartialEq)]
pub enum RenderData {
    /// Monospace text block (newlines allowed)
    Text { text: String, font_size: f32 },
    /// Filled rectangle, or an outline when `stroke_width` is set
    Rectangle {
        width: f32,
        height: f32,
        corner_radius: Option<f32>,
        stroke_width: Option<f32>,
    },
}

/// One drawable for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    pub id: RenderId,
    pub transform: Transform2D,
    /// Pivot relative to the object's own size; (0.5, 0.5) is centered
    pub pivot: Vec2,
    pub color: Color,
    pub data: RenderData,
}

impl RenderObject {
    pub fn new(id: RenderId, transform: Transform2D, color: Color, data: RenderData) -> Self {
        Self {
            id,
            transform,
            pivot: Vec2::splat(0.5),
            color,
            data,
        }
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }
}

/// Receiver of per-frame drawables
pub trait RenderSink {
    fn submit(&mut self, object: RenderObject);
}

/// Sink that just collects a frame's drawables (headless runs and tests)
#[derive(Debug, Default)]
pub struct FrameCollector {
    pub objects: Vec<RenderObject>,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn count_layer(&self, layer: RenderLayer) -> usize {
        self.objects
            .iter()
            .filter(|o| o.id.layer_bits() == layer as u32)
            .count()
    }

    /// True if any text drawable contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.objects.iter().any(|o| match &o.data {
            RenderData::Text { text, .. } => text.contains(needle),
            RenderData::Rectangle { .. } => false,
        })
    }
}

impl RenderSink for FrameCollector {
    fn submit(&mut self, object: RenderObject) {
        self.objects.push(object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_id_layers_do_not_collide() {
        let a = RenderId::new(RenderLayer::Asteroid, 7);
        let b = RenderId::new(RenderLayer::Particle, 7);
        assert_ne!(a, b);
        assert_eq!(a.index(), 7);
        assert_eq!(a.layer_bits(), RenderLayer::Asteroid as u32);
    }

    #[test]
    fn test_render_ids_are_sequential() {
        let mut ids = RenderIds::new(RenderLayer::Menu);
        assert_eq!(ids.next_id(), RenderId::new(RenderLayer::Menu, 0));
        assert_eq!(ids.next_id(), RenderId::new(RenderLayer::Menu, 1));
    }

    #[test]
    fn test_frame_collector_counts_layers() {
        let mut sink = FrameCollector::new();
        sink.submit(shapes::text(
            RenderId::new(RenderLayer::Hud, 1),
            Vec2::ZERO,
            "HULL 10",
            18.0,
            Color::GREY,
        ));
        assert_eq!(sink.count_layer(RenderLayer::Hud), 1);
        assert!(sink.has_text("HULL"));
        assert!(!sink.has_text("FUEL"));
    }
}
