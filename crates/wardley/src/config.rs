//! Configuration types for Wardley map rendering and editing.
//!
//! This module provides configuration structures that control the drawing
//! surface, the change-highlight animation and styling. All types implement
//! [`serde::Deserialize`] for loading from TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`CanvasConfig`] - Surface size and padding used by the coordinate mapper.
//! - [`AnimationConfig`] - Lifetime of glitch cues.
//! - [`StyleConfig`] - Visual styling options such as background color.
//!
//! # Example
//!
//! ```
//! # use wardley::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [canvas]
//!     width = 1200
//!     [animation]
//!     glitch_duration = 0.5
//!     "#,
//! ).unwrap();
//! assert_eq!(config.canvas().width(), 1200.0);
//! assert_eq!(config.canvas().height(), 600.0);
//! assert_eq!(config.animation().glitch_duration(), 0.5);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use wardley_core::{
    color::Color,
    geometry::{CoordinateMapper, Size, SurfaceError},
    glitch::DEFAULT_GLITCH_DURATION,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Drawing surface section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Change-highlight animation section.
    #[serde(default)]
    animation: AnimationConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(canvas: CanvasConfig, animation: AnimationConfig, style: StyleConfig) -> Self {
        Self {
            canvas,
            animation,
            style,
        }
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Returns the animation configuration.
    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Drawing surface dimensions.
///
/// A map's own `size [w, h]` statement overrides `width` and `height`; the
/// padding always comes from here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: f64,
    height: f64,
    padding: f64,
}

impl CanvasConfig {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Builds a coordinate mapper, using `size` instead of the configured
    /// dimensions when a map declares one.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] when the padding leaves no drawable area.
    pub fn mapper(&self, size: Option<Size>) -> Result<CoordinateMapper, SurfaceError> {
        let surface = size.unwrap_or_else(|| Size::new(self.width, self.height));
        CoordinateMapper::new(surface, self.padding)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 40.0,
        }
    }
}

/// Glitch cue animation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Cue lifetime in time units (seconds for the interactive session).
    glitch_duration: f64,
}

impl AnimationConfig {
    pub fn new(glitch_duration: f64) -> Self {
        Self { glitch_duration }
    }

    pub fn glitch_duration(&self) -> f64 {
        self.glitch_duration
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            glitch_duration: DEFAULT_GLITCH_DURATION,
        }
    }
}

/// Visual styling configuration for rendered maps.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] for maps, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}
