//! Engine configuration, loaded once at startup.
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 720
//!
//! [scroll]
//! wheel_speed = 40
//!
//! [log]
//! filter = "arbor_ui=debug"
//! ```
//!
//! Every section and key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{UiError, UiResult};
use crate::text::MonospaceShaper;

/// Initial window extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

/// Scroll container and scroll bar tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Content pixels per wheel notch.
    pub wheel_speed: f32,
    /// Scroll bar thickness.
    pub bar_width: f32,
    /// Knob pixels per wheel notch on a horizontal bar.
    pub bar_wheel_speed_x: f32,
    /// Knob pixels per wheel notch on a vertical bar.
    pub bar_wheel_speed_y: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            wheel_speed: 25.0,
            bar_width: 8.0,
            bar_wheel_speed_x: 25.0,
            bar_wheel_speed_y: 15.0,
        }
    }
}

/// Text metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Extra space between lines.
    pub line_spacing: f32,
    /// Cell width of the built-in monospace shaper.
    pub cell_width: f32,
    /// Line height of the built-in monospace shaper.
    pub line_height: f32,
    /// Edge of one glyph atlas slot.
    pub atlas_slot: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            line_spacing: 2.0,
            cell_width: 8.0,
            line_height: 16.0,
            atlas_slot: 32,
        }
    }
}

impl TextConfig {
    /// Builds the monospace shaper these metrics describe.
    #[must_use]
    pub const fn shaper(&self) -> MonospaceShaper {
        MonospaceShaper::new(self.cell_width, self.line_height, self.atlas_slot)
    }
}

/// Vertex batching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// A batch is flushed before it would reach this many vertices.
    pub max_batch_vertices: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_batch_vertices: 2400 }
    }
}

/// Logging, read by binaries only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: "info".to_owned() }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Window section.
    pub window: WindowConfig,
    /// Scroll section.
    pub scroll: ScrollConfig,
    /// Text section.
    pub text: TextConfig,
    /// Render section.
    pub render: RenderConfig,
    /// Log section.
    pub log: LogConfig,
}

impl UiConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`UiError::Config`] on malformed TOML or mistyped keys.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        toml::from_str(text).map_err(|e| {
            tracing::error!("invalid configuration: {e}");
            UiError::Config(e.to_string())
        })
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`UiError::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("cannot read {}: {e}", path.display());
            UiError::Config(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes back to TOML.
    ///
    /// # Errors
    ///
    /// [`UiError::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> UiResult<String> {
        toml::to_string_pretty(self).map_err(|e| UiError::Config(e.to_string()))
    }
}
