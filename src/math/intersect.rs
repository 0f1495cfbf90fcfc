//! Intersection tests between segments and circles
//!
//! Results are parametric along the segment: 0.0 at `start`, 1.0 at `end`.

use glam::Vec2;

/// Segments shorter than this are treated as a single point
const DEGENERATE_SEGMENT_EPSILON: f32 = 1e-5;

/// Where a segment enters and leaves a circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCircleHit {
    /// Parameter of the entry point, clamped to [0, 1]
    pub enter: f32,
    /// Parameter of the exit point, clamped to [0, 1]
    pub exit: f32,
}

impl SegmentCircleHit {
    /// Point on the segment at the entry parameter
    pub fn enter_point(&self, start: Vec2, end: Vec2) -> Vec2 {
        start + (end - start) * self.enter
    }
}

/// Intersect the segment `start..end` with a circle
///
/// A segment starting inside the circle enters at 0.0. A degenerate segment
/// reports a full-length hit if its point is inside the circle.
pub fn segment_circle_intersection(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> Option<SegmentCircleHit> {
    let delta = end - start;
    let len_sq = delta.length_squared();
    if len_sq < DEGENERATE_SEGMENT_EPSILON * DEGENERATE_SEGMENT_EPSILON {
        if (start - center).length_squared() <= radius * radius {
            return Some(SegmentCircleHit { enter: 0.0, exit: 1.0 });
        }
        return None;
    }

    let f = start - center;
    let b = 2.0 * f.dot(delta);
    let c = f.length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * len_sq * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * len_sq);
    let t2 = (-b + sqrt_d) / (2.0 * len_sq);
    let (enter, exit) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

    if enter > 1.0 || exit < 0.0 {
        return None;
    }

    Some(SegmentCircleHit {
        enter: enter.max(0.0),
        exit: exit.min(1.0),
    })
}

/// Strict overlap test between two circles
#[inline]
pub fn circles_overlap(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    (a_center - b_center).length() < a_radius + b_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_through_circle() {
        let hit = segment_circle_intersection(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), Vec2::ZERO, 5.0).unwrap();
        assert!((hit.enter - 0.25).abs() < 1e-5);
        assert!((hit.exit - 0.75).abs() < 1e-5);
        let p = hit.enter_point(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        assert!((p - Vec2::new(-5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_segment_missing_circle() {
        assert!(segment_circle_intersection(Vec2::new(-10.0, 6.0), Vec2::new(10.0, 6.0), Vec2::ZERO, 5.0).is_none());
    }

    #[test]
    fn test_segment_stopping_short() {
        assert!(segment_circle_intersection(Vec2::new(-20.0, 0.0), Vec2::new(-6.0, 0.0), Vec2::ZERO, 5.0).is_none());
    }

    #[test]
    fn test_segment_starting_inside() {
        let hit = segment_circle_intersection(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::ZERO, 5.0).unwrap();
        assert_eq!(hit.enter, 0.0);
        assert!((hit.exit - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_segment() {
        let inside = segment_circle_intersection(Vec2::ONE, Vec2::ONE, Vec2::ZERO, 5.0);
        assert_eq!(inside, Some(SegmentCircleHit { enter: 0.0, exit: 1.0 }));
        let outside = segment_circle_intersection(Vec2::splat(10.0), Vec2::splat(10.0), Vec2::ZERO, 5.0);
        assert!(outside.is_none());
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }
}
