//! Laser bolts

use glam::Vec2;

use crate::math::{Angle, Rect, Vec2Ext};

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    /// Counts down once the bolt has hit something
    pub time_to_destroy: Option<f32>,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, damage: f32) -> Self {
        Self {
            id: 0,
            position,
            velocity,
            damage,
            time_to_destroy: None,
        }
    }

    /// Schedule removal; an earlier deadline always wins
    pub fn destroy_after(&mut self, seconds: f32) {
        match self.time_to_destroy {
            Some(t) if t <= seconds => {}
            _ => self.time_to_destroy = Some(seconds),
        }
    }

    /// A bolt damages at most once; after that it only lingers on screen
    pub fn has_hit(&self) -> bool {
        self.time_to_destroy.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.time_to_destroy.is_some_and(|t| t <= 0.0)
    }

    pub fn is_outside(&self, bounds: &Rect) -> bool {
        !bounds.contains(self.position)
    }

    /// Segment covered over the next `lookahead` seconds
    pub fn swept_segment(&self, lookahead: f32) -> (Vec2, Vec2) {
        (self.position, self.position + self.velocity * lookahead)
    }

    pub fn direction(&self) -> Option<Vec2> {
        self.velocity.direction()
    }

    /// Glyph rotation: the bolt is drawn as a vertical bar
    pub fn render_rotation(&self) -> Angle {
        self.velocity.angle() + Angle::from_degrees(90.0)
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        if let Some(t) = self.time_to_destroy.as_mut() {
            *t -= dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_after_keeps_earliest() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 1.0);
        assert!(!p.is_destroyed());
        p.destroy_after(0.03);
        p.destroy_after(1.0);
        assert_eq!(p.time_to_destroy, Some(0.03));
        p.update(0.02);
        assert!(!p.is_destroyed());
        p.update(0.02);
        assert!(p.is_destroyed());
    }

    #[test]
    fn test_bounds_and_sweep() {
        let bounds = Rect::new(Vec2::ZERO, Vec2::splat(100.0));
        let mut p = Projectile::new(Vec2::new(50.0, 50.0), Vec2::new(1000.0, 0.0), 1.0);
        let (start, end) = p.swept_segment(0.03);
        assert_eq!(start, Vec2::new(50.0, 50.0));
        assert!((end - Vec2::new(80.0, 50.0)).length() < 1e-4);
        assert!(!p.is_outside(&bounds));
        p.update(0.1);
        assert!(p.is_outside(&bounds));
    }
}
