//! RGB color type, predefined color constants, and the `#RRGGBB` canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents an opaque RGB color with 8-bit channels.
///
/// The hex form produced by [`Color::to_hex`] is the canonical persisted
/// representation; it round-trips losslessly through [`Color::from_hex`].
///
/// # Examples
///
/// ```
/// use easel::draw::Color;
/// let orange = Color::new(255, 165, 0);
/// assert_eq!(orange.to_hex(), "#FFA500");
/// assert_eq!(Color::from_hex("#FFA500"), Some(orange));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Color {
    /// Creates a new color from 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from unit-range floating point channels.
    ///
    /// Values are clamped to 0.0-1.0 and scaled to 0-255 by truncation, so
    /// `0.999` maps to 254 rather than 255.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: unit_to_channel(r),
            g: unit_to_channel(g),
            b: unit_to_channel(b),
        }
    }

    /// Returns the channels scaled to 0.0-1.0, as expected by Cairo.
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    /// Formats the color as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parses `#RRGGBB`, `RRGGBB` or the shorthand `#RGB`.
    ///
    /// Returns `None` for anything else; callers decide on the fallback.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            6 => Some(Self {
                r: u8::from_str_radix(&digits[0..2], 16).ok()?,
                g: u8::from_str_radix(&digits[2..4], 16).ok()?,
                b: u8::from_str_radix(&digits[4..6], 16).ok()?,
            }),
            3 => {
                let expand = |idx: usize| {
                    u8::from_str_radix(&digits[idx..idx + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self {
                    r: expand(0)?,
                    g: expand(1)?,
                    b: expand(2)?,
                })
            }
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn unit_to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

// ============================================================================
// Predefined Color Constants (CSS palette)
// ============================================================================

/// Predefined black color (#000000), also the fallback for unreadable colors
pub const BLACK: Color = Color::new(0, 0, 0);

/// Predefined white color (#FFFFFF)
pub const WHITE: Color = Color::new(255, 255, 255);

/// Predefined red color (#FF0000)
pub const RED: Color = Color::new(255, 0, 0);

/// Predefined green color (#008000), CSS "green" rather than full-intensity lime
pub const GREEN: Color = Color::new(0, 128, 0);

/// Predefined lime color (#00FF00)
pub const LIME: Color = Color::new(0, 255, 0);

/// Predefined blue color (#0000FF)
pub const BLUE: Color = Color::new(0, 0, 255);

/// Predefined yellow color (#FFFF00)
pub const YELLOW: Color = Color::new(255, 255, 0);

/// Predefined orange color (#FFA500)
pub const ORANGE: Color = Color::new(255, 165, 0);

/// Predefined purple color (#800080)
pub const PURPLE: Color = Color::new(128, 0, 128);

/// Predefined pink color (#FFC0CB)
pub const PINK: Color = Color::new(255, 192, 203);

/// Predefined cyan color (#00FFFF)
pub const CYAN: Color = Color::new(0, 255, 255);

/// Predefined magenta color (#FF00FF)
pub const MAGENTA: Color = Color::new(255, 0, 255);

/// Predefined gray color (#808080)
pub const GRAY: Color = Color::new(128, 128, 128);

/// Predefined light gray color (#D3D3D3)
pub const LIGHT_GRAY: Color = Color::new(211, 211, 211);

/// Predefined dark gray color (#A9A9A9)
pub const DARK_GRAY: Color = Color::new(169, 169, 169);
