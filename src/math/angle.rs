//! Angle newtype
//!
//! Always stored in radians. Arithmetic does not normalize; use `looping_delta`
//! when the shortest way around the circle matters.

use std::f32::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Direction of travel around the circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    /// Increasing angle
    Positive,
    /// Decreasing angle
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(f32);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    #[inline]
    pub const fn from_radians(radians: f32) -> Self {
        Self(radians)
    }

    #[inline]
    pub fn from_degrees(degrees: f32) -> Self {
        Self(degrees.to_radians())
    }

    #[inline]
    pub fn radians(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn degrees(self) -> f32 {
        self.0.to_degrees()
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// -1.0 for negative angles, 1.0 otherwise
    #[inline]
    pub fn sign(self) -> f32 {
        super::sign(self.0)
    }

    /// Unit vector pointing along this angle
    #[inline]
    pub fn direction(self) -> Vec2 {
        let (sin, cos) = self.0.sin_cos();
        Vec2::new(cos, sin)
    }

    /// Signed difference `self - from`, wrapped into one turn
    ///
    /// Without a winding the result is the shortest way around, in [-π, π].
    /// With a winding the result has that winding's sign.
    pub fn looping_delta(self, from: Angle, winding: Option<Winding>) -> Angle {
        let mut delta = (self.0 - from.0) % TAU;
        match winding {
            None => {
                if delta > PI {
                    delta -= TAU;
                } else if delta < -PI {
                    delta += TAU;
                }
            }
            Some(Winding::Positive) => {
                if delta < 0.0 {
                    delta += TAU;
                }
            }
            Some(Winding::Negative) => {
                if delta > 0.0 {
                    delta -= TAU;
                }
            }
        }
        Angle(delta)
    }

    /// Step toward `target` around the circle by at most `max_delta`
    pub fn looping_move_towards(self, target: Angle, max_delta: Angle, winding: Option<Winding>) -> Angle {
        debug_assert!(max_delta >= Angle::ZERO);
        let delta = target.looping_delta(self, winding);
        if delta.abs() <= max_delta {
            return target;
        }
        self + max_delta * delta.sign()
    }

    /// Step toward `target` on the number line (no wrapping) by at most `max_delta`
    #[inline]
    pub fn move_towards(self, target: Angle, max_delta: Angle) -> Angle {
        Angle(super::move_towards(self.0, target.0, max_delta.0))
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Mul<f32> for Angle {
    type Output = Angle;
    fn mul(self, rhs: f32) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl Mul<Angle> for f32 {
    type Output = Angle;
    fn mul(self, rhs: Angle) -> Angle {
        Angle(self * rhs.0)
    }
}

impl Div<f32> for Angle {
    type Output = Angle;
    fn div(self, rhs: f32) -> Angle {
        Angle(self.0 / rhs)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Angle) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Angle) {
        self.0 -= rhs.0;
    }
}

impl MulAssign<f32> for Angle {
    fn mul_assign(&mut self, rhs: f32) {
        self.0 *= rhs;
    }
}
