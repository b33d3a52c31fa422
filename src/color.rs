//! # Colors
//!
//! Every demo talks about color the way a designer does: as `#rrggbb` strings.
//! [`Color`] keeps the channels as normalized `f32` values so they can go
//! straight into a uniform buffer, and converts to the three other places a
//! color ends up (the `wgpu` clear color, `egui` swatches, and 8-bit pixels
//! of the offscreen text surface).
//!
//! Colors serialize as hex strings, which keeps scene configuration files
//! readable:
//!
//! ```ignore
//! background = "#1a1a2e"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LessonError, Result};

/// A straight (non-premultiplied) RGBA color with channels in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb_u32(0xffffff);
    pub const BLACK: Color = Color::rgb_u32(0x000000);

    /// Builds an opaque color from a `0xRRGGBB` literal.
    pub const fn rgb_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Builds a color from a `0xRRGGBBAA` literal.
    pub const fn rgba_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 24) & 0xff) as f32 / 255.0,
            g: ((hex >> 16) & 0xff) as f32 / 255.0,
            b: ((hex >> 8) & 0xff) as f32 / 255.0,
            a: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self> {
        let digits = value.trim().trim_start_matches('#');
        let invalid = || LessonError::Color(value.to_owned());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let parsed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            3 => {
                let r = (parsed >> 8) & 0xf;
                let g = (parsed >> 4) & 0xf;
                let b = parsed & 0xf;
                Ok(Self::rgb_u32((r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)))
            }
            6 => Ok(Self::rgb_u32(parsed)),
            8 => Ok(Self::rgba_u32(parsed)),
            _ => Err(invalid()),
        }
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when the color is translucent.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Scales the color channels, leaving alpha untouched.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    pub fn to_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    pub fn to_egui(&self) -> egui::Color32 {
        let [r, g, b, a] = self.to_rgba8();
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = LessonError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// The six accent colors shared by the swatch pickers.
pub const PALETTE: [(Color, &str); 6] = [
    (Color::rgb_u32(0x6c5ce7), "Purple"),
    (Color::rgb_u32(0x00cec9), "Teal"),
    (Color::rgb_u32(0xfd79a8), "Pink"),
    (Color::rgb_u32(0xfdcb6e), "Gold"),
    (Color::rgb_u32(0xff7675), "Red"),
    (Color::rgb_u32(0x55efc4), "Mint"),
];

/// Background used by every demo except lesson 1.
pub const MIDNIGHT: Color = Color::rgb_u32(0x1a1a2e);

/// Default subject color.
pub const PURPLE: Color = PALETTE[0].0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        let purple = Color::from_hex("#6c5ce7").unwrap();
        assert_eq!(purple.to_rgba8(), [0x6c, 0x5c, 0xe7, 0xff]);

        let white = Color::from_hex("#fff").unwrap();
        assert_eq!(white, Color::WHITE);

        let faded = Color::from_hex("ff6b6b55").unwrap();
        assert_eq!(faded.to_rgba8(), [0xff, 0x6b, 0x6b, 0x55]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#+12345").is_err());
    }

    #[test]
    fn hex_formatting_matches_input() {
        assert_eq!(PURPLE.to_hex(), "#6c5ce7");
        assert_eq!(Color::rgba_u32(0x55efc455).to_hex(), "#55efc455");
    }
}
