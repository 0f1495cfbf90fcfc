//! RGBA color with CSS hex conversion

use crate::math::lerp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    /// Default text / rock grey
    pub const GREY: Color = Color::rgb(0x77, 0x77, 0x77);
    pub const DIM_GREY: Color = Color::rgb(0x55, 0x55, 0x55);
    /// Rock tint at full difficulty
    pub const ROCK_BLUE: Color = Color::rgb(0x77, 0x77, 0xFF);
    pub const BACKGROUND_ROCK: Color = Color::rgb(0x10, 0x10, 0x10);
    /// Hit flash
    pub const FLASH_RED: Color = Color::rgb(0xFF, 0x77, 0x77);
    pub const LASER_RED: Color = Color::rgb(0xFF, 0x33, 0x33);
    pub const THRUST_YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
    pub const THRUST_ORANGE: Color = Color::rgb(0xFF, 0x77, 0x00);
    pub const UPGRADE_GREEN: Color = Color::rgb(0x99, 0xFF, 0x99);
    /// Button states
    pub const PRESSED_GREY: Color = Color::rgb(0xBB, 0xBB, 0xBB);
    pub const DISABLED_RED: Color = Color::rgb(0x55, 0x22, 0x22);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            let byte = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
            Some(byte as f32 / 255.0)
        };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 1.0 },
        })
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_css(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }

    /// Channel-wise interpolation, `t` clamped to [0, 1]
    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        Color {
            r: lerp(a.r, b.r, t),
            g: lerp(a.g, b.g, t),
            b: lerp(a.b, b.b, t),
            a: lerp(a.a, b.a, t),
        }
    }
}
