//! 2D math primitives
//!
//! `glam::Vec2` is the vector type. Everything else the game needs on top of it
//! lives here:
//! - `Angle`: radians newtype with looping/absolute move-towards helpers
//! - `Transform2D`: translation, rotation, scale and render depth
//! - `Rect`: axis-aligned bounds
//! - `intersect`: segment/circle tests used by the collision code

mod angle;
pub mod intersect;
mod rect;
mod transform;

pub use angle::{Angle, Winding};
pub use glam::Vec2;
pub use intersect::{SegmentCircleHit, circles_overlap, segment_circle_intersection};
pub use rect::Rect;
pub use transform::Transform2D;

/// Magnitudes at or below this have no usable direction
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Extra vector operations the simulation relies on
pub trait Vec2Ext: Sized {
    /// Unit vector, or `None` for a (near) zero vector
    fn direction(self) -> Option<Vec2>;
    /// Unit vector and original length, or `None` for a (near) zero vector
    fn direction_and_length(self) -> Option<(Vec2, f32)>;
    /// Rotate counter-clockwise (in +y-down screen space: clockwise) by `angle`
    fn rotated_by(self, angle: Angle) -> Vec2;
    /// Rotate by a quarter turn in the given winding direction
    fn turned_90(self, winding: Winding) -> Vec2;
    /// Angle of the vector measured from +x
    fn angle(self) -> Angle;
    /// 2D cross product (z component of the 3D cross)
    fn cross(self, other: Vec2) -> f32;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn direction(self) -> Option<Vec2> {
        self.direction_and_length().map(|(dir, _)| dir)
    }

    #[inline]
    fn direction_and_length(self) -> Option<(Vec2, f32)> {
        let len = self.length();
        if len <= DIRECTION_EPSILON {
            return None;
        }
        Some((self / len, len))
    }

    #[inline]
    fn rotated_by(self, angle: Angle) -> Vec2 {
        let (sin, cos) = angle.radians().sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn turned_90(self, winding: Winding) -> Vec2 {
        match winding {
            Winding::Positive => Vec2::new(-self.y, self.x),
            Winding::Negative => Vec2::new(self.y, -self.x),
        }
    }

    #[inline]
    fn angle(self) -> Angle {
        Angle::from_radians(self.y.atan2(self.x))
    }

    #[inline]
    fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

/// -1.0 for negative values, 1.0 otherwise (zero counts as positive)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

#[inline]
pub fn lerp_unclamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    lerp_unclamped(a, b, t.clamp(0.0, 1.0))
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1]
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    debug_assert!(a != b, "inverse_lerp over an empty range");
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Remap `value` from `[from_a, from_b]` onto `[to_a, to_b]`, clamping to the source range
#[inline]
pub fn map_range(value: f32, from_a: f32, from_b: f32, to_a: f32, to_b: f32) -> f32 {
    lerp_unclamped(to_a, to_b, inverse_lerp(from_a, from_b, value))
}

/// Step `current` toward `target` by at most `max_delta`
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        return target;
    }
    current + sign(delta) * max_delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_of_zero_vector_is_none() {
        assert!(Vec2::ZERO.direction().is_none());
        assert!(Vec2::new(1e-7, 0.0).direction().is_none());
        let dir = Vec2::new(3.0, 4.0).direction().unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_by_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotated_by(Angle::from_degrees(90.0));
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
        assert_eq!(v.angle().degrees().round(), 90.0);
    }

    #[test]
    fn test_turned_90_matches_rotation() {
        let v = Vec2::new(2.0, 1.0);
        let turned = v.turned_90(Winding::Positive);
        let rotated = v.rotated_by(Angle::from_degrees(90.0));
        assert!((turned - rotated).length() < 1e-5);
        assert_eq!(v.turned_90(Winding::Negative), -turned);
    }

    #[test]
    fn test_cross_sign() {
        let x = Vec2::X;
        let y = Vec2::Y;
        assert_eq!(x.cross(y), 1.0);
        assert_eq!(y.cross(x), -1.0);
        assert_eq!(x.cross(x), 0.0);
    }

    #[test]
    fn test_scalar_helpers() {
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp_unclamped(0.0, 10.0, 2.0), 20.0);
        assert_eq!(inverse_lerp(50.0, 0.0, 25.0), 0.5);
        assert_eq!(map_range(15.0, 10.0, 20.0, 1.0, 0.0), 0.5);
        assert_eq!(map_range(30.0, 10.0, 20.0, 1.0, 0.0), 0.0);
        assert_eq!(move_towards(0.0, 5.0, 2.0), 2.0);
        assert_eq!(move_towards(4.0, 5.0, 2.0), 5.0);
        assert_eq!(sign(0.0), 1.0);
    }
}
