//! Game configuration.
//!
//! A single [`GameConfig`] holds the window, camera, console and UI style
//! settings. Every field has a default, so a JSON file only needs the values it
//! overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{CameraFollow, Viewport};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(255, 255, 255);
    pub const BLACK: Self = Self(0, 0, 0);
    pub const ANTI_FLASH_WHITE: Self = Self(242, 243, 244);
}

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

/// Look of a button. Unset fields fall back to the renderer's defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub font_name: Option<String>,
    pub font_color: Option<Rgb>,
    pub bg_color: Option<Rgb>,
    pub border_color: Option<Rgb>,
    pub border_width: Option<u32>,
    pub bg_color_pressed: Option<Rgb>,
    pub border_color_pressed: Option<Rgb>,
}

/// Built-in button styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    #[default]
    GoldenTanoi,
    Danger,
    Primary,
}

impl From<StylePreset> for Style {
    fn from(preset: StylePreset) -> Self {
        match preset {
            StylePreset::GoldenTanoi => Style {
                font_name: Some("Dilo World".into()),
                font_color: Some(Rgb(255, 207, 112)),
                bg_color: Some(Rgb(0, 140, 176)),
                border_color: Some(Rgb(0, 60, 75)),
                ..Style::default()
            },
            StylePreset::Danger => Style {
                font_color: Some(Rgb::WHITE),
                border_width: Some(2),
                bg_color: Some(Rgb(217, 4, 41)),
                bg_color_pressed: Some(Rgb(255, 166, 158)),
                border_color_pressed: Some(Rgb(255, 166, 158)),
                ..Style::default()
            },
            StylePreset::Primary => Style {
                font_color: Some(Rgb::WHITE),
                border_width: Some(2),
                bg_color: Some(Rgb(52, 152, 219)),
                bg_color_pressed: Some(Rgb(41, 128, 185)),
                border_color_pressed: Some(Rgb(41, 128, 185)),
                ..Style::default()
            },
        }
    }
}

/// Either a preset name or a fully spelled-out style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleSetting {
    Preset(StylePreset),
    Custom(Style),
}

impl StyleSetting {
    pub fn resolve(&self) -> Style {
        match self {
            StyleSetting::Preset(preset) => Style::from(*preset),
            StyleSetting::Custom(style) => style.clone(),
        }
    }
}

impl Default for StyleSetting {
    fn default() -> Self {
        StyleSetting::Preset(StylePreset::GoldenTanoi)
    }
}

/// Debug console appearance and history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub line_height: f64,
    /// Background of prompt and echo lines.
    pub input_background: Rgba,
    /// Background of result and error lines.
    pub output_background: Rgba,
    pub input_text: Rgb,
    pub result_text: Rgb,
    pub error_text: Rgb,
    /// Maximum transcript entries kept; `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            line_height: 25.0,
            input_background: Rgba(100, 0, 0, 150),
            output_background: Rgba(0, 100, 0, 150),
            input_text: Rgb::BLACK,
            result_text: Rgb::WHITE,
            error_text: Rgb(255, 166, 158),
            history_limit: None,
        }
    }
}

/// Locations of the textures loaded at startup, relative to `root`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub menu_background: PathBuf,
    pub end_background: PathBuf,
    pub camera_sprite: PathBuf,
}

impl AssetPaths {
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            menu_background: PathBuf::from("titles/menu_background.jpg"),
            end_background: PathBuf::from("titles/victory_background.jpg"),
            camera_sprite: PathBuf::from("tiles/pnj.png"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Rgb,
    /// Simulation ticks per second.
    pub tick_rate: f64,
    /// Camera target speed in world units per tick.
    pub camera_movement_speed: f64,
    pub invert_mouse: bool,
    pub button_style: StyleSetting,
    pub console: ConsoleConfig,
    pub assets: AssetPaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "PyWeek35".into(),
            width: 800,
            height: 600,
            background_color: Rgb::ANTI_FLASH_WHITE,
            tick_rate: 60.0,
            camera_movement_speed: 5.0,
            invert_mouse: false,
            button_style: StyleSetting::default(),
            console: ConsoleConfig::default(),
            assets: AssetPaths::default(),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|err| match err {
            ConfigError::Json(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn from_path_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be a positive number, got {}",
                self.tick_rate
            )));
        }
        if !self.camera_movement_speed.is_finite() || self.camera_movement_speed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera_movement_speed must be a non-negative number, got {}",
                self.camera_movement_speed
            )));
        }
        if self.console.line_height <= 0.0 {
            return Err(ConfigError::Invalid("console.line_height must be positive".into()));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn camera_follow(&self) -> CameraFollow {
        CameraFollow::new(self.camera_movement_speed).with_invert_mouse(self.invert_mouse)
    }
}
