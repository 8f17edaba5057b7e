//! Configuration enum types.

use crate::draw::Color;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_color = "red"
///
/// # Hex string
/// default_color = "#FF8000"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (black, white, red, green, blue, yellow, orange, ...) or `#RRGGBB`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Strings go through the same lookup as stored shape rows. Unknown
    /// strings default to black with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => {
                let (color, recognised) = crate::util::parse_color_lossy(name);
                if !recognised {
                    warn!("Unknown color '{}', using black", name);
                }
                color
            }
            ColorSpec::Rgb([r, g, b]) => Color::new(*r, *g, *b),
        }
    }
}

/// Which persistence backend the CLI opens.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON document on disk
    File,
    /// Process memory only; nothing survives exit
    Memory,
}

/// Where the file backend keeps its data.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    /// `$XDG_DATA_HOME/easel` (falls back to the config directory)
    Auto,
    /// Next to `config.toml`
    Config,
    /// `storage.custom_directory`
    Custom,
}

/// Compression preference for the drawings file.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageCompression {
    /// Compress once the payload exceeds `auto_compress_threshold_kb`
    Auto,
    /// Always compress
    On,
    /// Never compress
    Off,
}
