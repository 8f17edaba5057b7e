//! Configuration file support for easel.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/easel/config.toml`. Settings include the starting tool state,
//! the canvas size, and where and how drawings are stored.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, StorageBackend, StorageCompression, StorageLocation};
pub use types::{DrawingConfig, StorageConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MIN_CANVAS_SIZE: u32 = 16;
const MAX_CANVAS_SIZE: u32 = 16_384;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_shape = "rectangle"
/// fill_mode = true
/// canvas_width = 1024
/// canvas_height = 768
///
/// [storage]
/// backend = "file"
/// location = "custom"
/// custom_directory = "~/Drawings/easel"
/// compress = "auto"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Starting tool state and canvas size
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Drawing persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas_width`, `canvas_height`: 16 - 16384
    /// - `max_file_size_mb`: 1 - 1024
    /// - `max_shapes_per_drawing`: 1 - 1000000
    /// - `auto_compress_threshold_kb`: at least 1
    pub fn validate_and_clamp(&mut self) {
        for (label, value) in [
            ("canvas_width", &mut self.drawing.canvas_width),
            ("canvas_height", &mut self.drawing.canvas_height),
        ] {
            if !(MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE).contains(&*value) {
                log::warn!(
                    "Invalid {} {}, clamping to {}-{} range",
                    label,
                    value,
                    MIN_CANVAS_SIZE,
                    MAX_CANVAS_SIZE
                );
                *value = (*value).clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE);
            }
        }

        if !(1..=1024).contains(&self.storage.max_file_size_mb) {
            log::warn!(
                "Invalid max_file_size_mb {}, clamping to 1-1024 range",
                self.storage.max_file_size_mb
            );
            self.storage.max_file_size_mb = self.storage.max_file_size_mb.clamp(1, 1024);
        }

        if !(1..=1_000_000).contains(&self.storage.max_shapes_per_drawing) {
            log::warn!(
                "Invalid max_shapes_per_drawing {}, clamping to 1-1000000 range",
                self.storage.max_shapes_per_drawing
            );
            self.storage.max_shapes_per_drawing =
                self.storage.max_shapes_per_drawing.clamp(1, 1_000_000);
        }

        if self.storage.auto_compress_threshold_kb == 0 {
            log::warn!("Invalid auto_compress_threshold_kb 0, using 1");
            self.storage.auto_compress_threshold_kb = 1;
        }

        if let ColorSpec::Name(name) = &self.drawing.default_color {
            if !crate::util::parse_color_lossy(name).1 {
                log::warn!("Invalid default_color '{}', falling back to 'black'", name);
                self.drawing.default_color = ColorSpec::Name("black".to_string());
            }
        }

        if self.storage.location == StorageLocation::Custom
            && self
                .storage
                .custom_directory
                .as_deref()
                .is_none_or(|dir| dir.trim().is_empty())
        {
            log::warn!(
                "storage.location is \"custom\" but custom_directory is empty; falling back to \"auto\""
            );
            self.storage.location = StorageLocation::Auto;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/easel/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("easel");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        config.validate_and_clamp();
        Ok(config)
    }

    /// Parses TOML text without validation.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid config TOML")
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Color, ShapeKind};

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.drawing.canvas_width, 800);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.backup_retention, 1);
    }

    #[test]
    fn parses_drawing_and_storage_sections() {
        let config = Config::from_toml(
            r#"
            [drawing]
            default_color = [10, 20, 30]
            default_shape = "ellipse"
            fill_mode = true

            [storage]
            backend = "memory"
            compress = "off"
            "#,
        )
        .unwrap();

        assert_eq!(config.drawing.default_color.to_color(), Color::new(10, 20, 30));
        assert_eq!(config.drawing.default_shape, ShapeKind::Ellipse);
        assert!(config.drawing.fill_mode);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.compress, StorageCompression::Off);
        assert_eq!(config.storage.location, StorageLocation::Auto);
    }

    #[test]
    fn named_and_hex_colors_resolve() {
        assert_eq!(
            ColorSpec::Name("Orange".into()).to_color(),
            Color::new(255, 165, 0)
        );
        assert_eq!(
            ColorSpec::Name("#00ff00".into()).to_color(),
            Color::new(0, 255, 0)
        );
        assert_eq!(
            ColorSpec::Name("mauve-ish".into()).to_color(),
            Color::new(0, 0, 0)
        );
    }

    #[test]
    fn validate_and_clamp_fixes_out_of_range_values() {
        let mut config = Config::default();
        config.drawing.canvas_width = 1;
        config.drawing.canvas_height = 100_000;
        config.storage.max_file_size_mb = 0;
        config.storage.max_shapes_per_drawing = 0;
        config.storage.auto_compress_threshold_kb = 0;
        config.drawing.default_color = ColorSpec::Name("nope".into());
        config.storage.location = StorageLocation::Custom;

        config.validate_and_clamp();

        assert_eq!(config.drawing.canvas_width, MIN_CANVAS_SIZE);
        assert_eq!(config.drawing.canvas_height, MAX_CANVAS_SIZE);
        assert_eq!(config.storage.max_file_size_mb, 1);
        assert_eq!(config.storage.max_shapes_per_drawing, 1);
        assert_eq!(config.storage.auto_compress_threshold_kb, 1);
        assert_eq!(
            config.drawing.default_color,
            ColorSpec::Name("black".into())
        );
        assert_eq!(config.storage.location, StorageLocation::Auto);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[drawing\ncanvas_width = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn load_from_clamps_values() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[drawing]\ncanvas_width = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.drawing.canvas_width, MIN_CANVAS_SIZE);
    }

    #[test]
    fn schema_mentions_both_sections() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        assert!(schema.contains("drawing"));
        assert!(schema.contains("storage"));
    }
}
