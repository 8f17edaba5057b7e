//! Configuration type definitions.

use super::enums::{ColorSpec, StorageBackend, StorageCompression, StorageLocation};
use crate::draw::ShapeKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the tool state a new session starts with and the canvas size
/// recorded in saved drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - a named color (red, green, blue, ...), a `#RRGGBB`
    /// string, or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Shape tool selected at startup (line, rectangle, ellipse)
    #[serde(default = "default_shape")]
    pub default_shape: ShapeKind,

    /// Start with fill mode enabled for rectangles and ellipses
    #[serde(default)]
    pub fill_mode: bool,

    /// Canvas width in pixels (valid range: 16 - 16384)
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,

    /// Canvas height in pixels (valid range: 16 - 16384)
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_shape: default_shape(),
            fill_mode: false,
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
        }
    }
}

/// Persistence settings.
///
/// Chooses the backend and, for the file backend, where the drawings file
/// lives and how it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Backend used by the CLI (file, memory)
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Data directory selection (auto, config, custom)
    #[serde(default = "default_location")]
    pub location: StorageLocation,

    /// Directory used when `location = "custom"`; `~/` is expanded
    #[serde(default)]
    pub custom_directory: Option<String>,

    /// Gzip the drawings file (auto, on, off)
    #[serde(default = "default_compress")]
    pub compress: StorageCompression,

    /// Payload size in KiB above which `compress = "auto"` switches to gzip
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Largest drawings file that will be read or written, in MiB (valid range: 1 - 1024)
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Drawings with more shapes are truncated on load (valid range: 1 - 1000000)
    #[serde(default = "default_max_shapes_per_drawing")]
    pub max_shapes_per_drawing: usize,

    /// Keep the previous drawings file as `drawings.json.bak` when > 0
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            location: default_location(),
            custom_directory: None,
            compress: default_compress(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            max_file_size_mb: default_max_file_size_mb(),
            max_shapes_per_drawing: default_max_shapes_per_drawing(),
            backup_retention: default_backup_retention(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_shape() -> ShapeKind {
    ShapeKind::Line
}

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_location() -> StorageLocation {
    StorageLocation::Auto
}

fn default_compress() -> StorageCompression {
    StorageCompression::Auto
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_max_shapes_per_drawing() -> usize {
    10_000
}

fn default_backup_retention() -> usize {
    1
}
