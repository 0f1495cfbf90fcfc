//! 2D transform: translate, rotate, scale
//!
//! `depth` only orders drawables for the renderer; it has no physical meaning.

use std::ops::Mul;

use glam::Vec2;

use super::{Angle, Vec2Ext};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub translation: Vec2,
    pub rotation: Angle,
    pub scale: Vec2,
    pub depth: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        translation: Vec2::ZERO,
        rotation: Angle::ZERO,
        scale: Vec2::ONE,
        depth: 0.0,
    };

    pub fn new(translation: Vec2, rotation: Angle, scale: Vec2) -> Self {
        Self {
            translation,
            rotation,
            scale,
            depth: 0.0,
        }
    }

    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Collision code treats scale as uniform and reads the x component
    #[inline]
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }

    /// Local point to parent space
    #[inline]
    pub fn transform_position(&self, position: Vec2) -> Vec2 {
        self.translation + position.rotated_by(self.rotation) * self.scale
    }

    /// Local direction to parent space (rotation only)
    #[inline]
    pub fn transform_direction(&self, direction: Vec2) -> Vec2 {
        direction.rotated_by(self.rotation)
    }

    /// Parent-space direction back into the local frame (rotation only)
    #[inline]
    pub fn inverse_transform_direction(&self, direction: Vec2) -> Vec2 {
        direction.rotated_by(-self.rotation)
    }
}

impl Mul for Transform2D {
    type Output = Transform2D;

    /// `parent * child`; non-uniform child scale under a rotated parent is not supported
    fn mul(self, child: Transform2D) -> Transform2D {
        Transform2D {
            translation: self.translation + child.translation.rotated_by(self.rotation) * self.scale,
            rotation: self.rotation + child.rotation,
            scale: self.scale * child.scale,
            depth: self.depth + child.depth,
        }
    }
}
