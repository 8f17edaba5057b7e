//! Shape definitions for the drawing canvas.

use super::color::Color;
use crate::util::Bounds;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of figures the canvas knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Straight segment from the first point to the second
    Line,
    /// Axis-aligned rectangle spanned by two opposite corners
    Rectangle,
    /// Ellipse inscribed in the rectangle spanned by two opposite corners
    Ellipse,
}

impl ShapeKind {
    /// Name used in persisted shape rows.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ShapeKind::Line),
            "rectangle" | "rect" => Ok(ShapeKind::Rectangle),
            "ellipse" | "oval" => Ok(ShapeKind::Ellipse),
            other => Err(format!("unknown shape kind '{other}'")),
        }
    }
}

/// Immutable description of one drawn figure.
///
/// `(x1, y1)` and `(x2, y2)` are the press and release points. They are
/// directional for a [`ShapeKind::Line`] and interchangeable for rectangles
/// and ellipses. `filled` is carried for every kind but only affects
/// rectangles and ellipses when rendered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Color,
    pub filled: bool,
}

impl Shape {
    pub fn new(
        kind: ShapeKind,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        color: Color,
        filled: bool,
    ) -> Self {
        Self {
            kind,
            x1,
            y1,
            x2,
            y2,
            color,
            filled,
        }
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, color: Color) -> Self {
        Self::new(ShapeKind::Line, (x1, y1), (x2, y2), color, false)
    }

    pub fn rectangle(x1: f64, y1: f64, x2: f64, y2: f64, color: Color, filled: bool) -> Self {
        Self::new(ShapeKind::Rectangle, (x1, y1), (x2, y2), color, filled)
    }

    pub fn ellipse(x1: f64, y1: f64, x2: f64, y2: f64, color: Color, filled: bool) -> Self {
        Self::new(ShapeKind::Ellipse, (x1, y1), (x2, y2), color, filled)
    }

    /// Whether rendering should fill the interior. Always `false` for lines.
    pub fn renders_filled(&self) -> bool {
        self.filled && self.kind != ShapeKind::Line
    }

    /// Normalised bounding box spanned by the two corner points.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.x1, self.y1, self.x2, self.y2)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at ({:.1},{:.1})-({:.1},{:.1}), color={}, filled={}",
            self.kind, self.x1, self.y1, self.x2, self.y2, self.color, self.filled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED};

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Rectangle".parse::<ShapeKind>(), Ok(ShapeKind::Rectangle));
        assert_eq!("ELLIPSE".parse::<ShapeKind>(), Ok(ShapeKind::Ellipse));
        assert_eq!(" line ".parse::<ShapeKind>(), Ok(ShapeKind::Line));
        assert!("triangle".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn kind_name_round_trips() {
        for kind in [ShapeKind::Line, ShapeKind::Rectangle, ShapeKind::Ellipse] {
            assert_eq!(kind.as_str().parse::<ShapeKind>(), Ok(kind));
        }
    }

    #[test]
    fn line_never_renders_filled() {
        let mut line = Shape::line(0.0, 0.0, 10.0, 10.0, RED);
        line.filled = true;
        assert!(!line.renders_filled());

        let rect = Shape::rectangle(0.0, 0.0, 10.0, 10.0, BLUE, true);
        assert!(rect.renders_filled());
    }

    #[test]
    fn bounds_are_order_independent() {
        let a = Shape::ellipse(20.0, 30.0, 5.0, 10.0, RED, false).bounds();
        let b = Shape::ellipse(5.0, 10.0, 20.0, 30.0, RED, false).bounds();
        assert_eq!(a, b);
        assert_eq!(a.x, 5.0);
        assert_eq!(a.y, 10.0);
        assert_eq!(a.width, 15.0);
        assert_eq!(a.height, 20.0);
    }
}
