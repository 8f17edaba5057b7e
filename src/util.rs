//! Utility functions for colors and geometry.
//!
//! This module provides:
//! - Name-to-color mapping for config files and legacy snapshot rows
//! - Exact color-to-name lookup for log and statistics output
//! - Corner-point normalisation for rectangles and ellipses

use crate::draw::{Color, color::*};

// ============================================================================
// Color Mapping
// ============================================================================

/// Fixed table of named colors, in lookup order.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", BLACK),
    ("white", WHITE),
    ("red", RED),
    ("green", GREEN),
    ("lime", LIME),
    ("blue", BLUE),
    ("yellow", YELLOW),
    ("orange", ORANGE),
    ("purple", PURPLE),
    ("pink", PINK),
    ("cyan", CYAN),
    ("magenta", MAGENTA),
    ("gray", GRAY),
    ("lightgray", LIGHT_GRAY),
    ("darkgray", DARK_GRAY),
];

/// Maps color name strings to Color values.
///
/// Used by the configuration system and by the snapshot decoder for rows that
/// carry a name instead of a hex value.
///
/// # Supported Names (case-insensitive, `_`, `-` and spaces ignored)
/// black, white, red, green, lime, blue, yellow, orange, purple, pink, cyan,
/// magenta, gray/grey, lightgray, darkgray
pub fn name_to_color(name: &str) -> Option<Color> {
    let normalized: String = name
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect::<String>()
        .to_lowercase()
        .replace("grey", "gray");

    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == normalized)
        .map(|(_, color)| *color)
}

/// Maps a Color value to its table name when it matches exactly.
///
/// Returns `None` for colors outside the table. Exact matching keeps two
/// distinct custom colors from collapsing onto the same label.
pub fn color_to_name(color: &Color) -> Option<&'static str> {
    NAMED_COLORS
        .iter()
        .find(|(_, candidate)| candidate == color)
        .map(|(name, _)| *name)
}

/// Human-readable label: the table name when there is one, hex otherwise.
pub fn color_label(color: &Color) -> String {
    match color_to_name(color) {
        Some(name) => name.to_uppercase(),
        None => color.to_hex(),
    }
}

/// Resolves a persisted color string.
///
/// Hex is tried first; the named table is only a fallback for rows that were
/// written with a name. Unreadable input resolves to black.
pub fn parse_color_lossy(raw: &str) -> (Color, bool) {
    if let Some(color) = Color::from_hex(raw) {
        return (color, true);
    }
    match name_to_color(raw) {
        Some(color) => (color, true),
        None => (BLACK, false),
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Axis-aligned box with non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Normalises two opposite corners into a top-left origin plus extent.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_lookup_is_forgiving_about_spelling() {
        assert_eq!(name_to_color("RED"), Some(RED));
        assert_eq!(name_to_color("light_gray"), Some(LIGHT_GRAY));
        assert_eq!(name_to_color("Dark Grey"), Some(DARK_GRAY));
        assert_eq!(name_to_color("chartreuse"), None);
    }

    #[test]
    fn color_names_round_trip() {
        for (name, color) in NAMED_COLORS {
            assert_eq!(name_to_color(name), Some(*color));
            assert_eq!(color_to_name(color), Some(*name));
        }
    }

    #[test]
    fn custom_colors_have_no_name() {
        let nearly_gray = Color::new(129, 128, 128);
        assert_eq!(color_to_name(&nearly_gray), None);
        assert_eq!(color_label(&nearly_gray), "#818080");
        assert_eq!(color_label(&ORANGE), "ORANGE");
    }

    #[test]
    fn lossy_parse_prefers_hex_then_names_then_black() {
        assert_eq!(parse_color_lossy("#00FF00"), (LIME, true));
        assert_eq!(parse_color_lossy("purple"), (PURPLE, true));
        assert_eq!(parse_color_lossy("not-a-color"), (BLACK, false));
        assert_eq!(parse_color_lossy(""), (BLACK, false));
    }

    #[test]
    fn bounds_center_and_degeneracy() {
        let bounds = Bounds::from_corners(10.0, 10.0, 0.0, 20.0);
        assert_eq!(bounds.center(), (5.0, 15.0));
        assert!(!bounds.is_degenerate());
        assert!(Bounds::from_corners(3.0, 3.0, 3.0, 9.0).is_degenerate());
    }
}
