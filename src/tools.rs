//! Editing tool settings shown by the client widget.
//!
//! Both tools share the stroke settings (available sizes, default size, how
//! the size picker behaves, antialiasing). The eraser is exactly those
//! settings; the brush embeds them by value and adds a color palette.
//!
//! ```toml
//! [eraser]
//! sizes = [5, 10, 20, 40, 70]
//! default_size = 20
//! size_mode = "defaults"    # "fixed" hides the custom size slider
//! antialias = true
//!
//! [brush]
//! sizes = [5, 10, 20, 40, 70]
//! default_size = 20
//! size_mode = "defaults"
//! colors = ["red", "green", "blue", "yellow", "black", "white"]
//! default_color = "red"
//! color_mode = "defaults"   # "fixed" hides the custom color picker
//! antialias = true
//! ```
//!
//! The brush table is flat on the wire; [`Brush`] converts it into the
//! composed form through [`BrushTable`].

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the user may pick values outside the configured list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerMode {
    /// Only the configured values are offered.
    Fixed,
    /// Configured values are presets; custom values are allowed.
    #[default]
    Defaults,
}

/// A brush color: any CSS color string, or an explicit RGBA quadruple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Css(String),
    Rgba([u16; 4]),
}

impl Color {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Color::Css(s) if s.trim().is_empty() => Err(ConfigError::Validation(
                "brush color strings must not be empty".into(),
            )),
            Color::Rgba(parts) if parts.iter().any(|c| *c > 255) => {
                Err(ConfigError::Validation(format!(
                    "brush color {:?} has a component outside 0-255",
                    parts
                )))
            }
            _ => Ok(()),
        }
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Color::Css(value.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Css(s) => f.write_str(s),
            Color::Rgba([r, g, b, a]) => write!(f, "rgba({r}, {g}, {b}, {a})"),
        }
    }
}

/// Stroke settings shared by every drawing tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrokeSettings {
    /// Stroke widths offered in the size picker, in pixels.
    pub sizes: Vec<u32>,
    /// Width selected when the tool is first activated. Absent lets the
    /// client derive one from the canvas size.
    pub default_size: Option<u32>,
    pub size_mode: PickerMode,
    pub antialias: bool,
}

/// The eraser carries nothing beyond the shared stroke settings.
pub type Eraser = StrokeSettings;

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            sizes: vec![5, 10, 20, 40, 70],
            default_size: Some(20),
            size_mode: PickerMode::Defaults,
            antialias: true,
        }
    }
}

impl StrokeSettings {
    pub fn validate(&self, tool: &str) -> Result<(), ConfigError> {
        if self.sizes.contains(&0) {
            return Err(ConfigError::Validation(format!(
                "{tool}.sizes must not contain 0"
            )));
        }
        if self.default_size == Some(0) {
            return Err(ConfigError::Validation(format!(
                "{tool}.default_size must be positive"
            )));
        }
        Ok(())
    }
}

/// Brush settings: stroke settings plus a color palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BrushTable", into = "BrushTable")]
pub struct Brush {
    pub stroke: StrokeSettings,
    pub colors: Vec<Color>,
    pub default_color: Option<Color>,
    pub color_mode: PickerMode,
}

fn default_colors() -> Vec<Color> {
    ["red", "green", "blue", "yellow", "black", "white"]
        .into_iter()
        .map(Color::from)
        .collect()
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            stroke: StrokeSettings::default(),
            colors: default_colors(),
            default_color: Some(Color::from("red")),
            color_mode: PickerMode::Defaults,
        }
    }
}

impl Brush {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stroke.validate("brush")?;
        if self.color_mode == PickerMode::Fixed && self.colors.is_empty() {
            return Err(ConfigError::Validation(
                "brush.colors must not be empty when brush.color_mode is \"fixed\"".into(),
            ));
        }
        for color in self.colors.iter().chain(self.default_color.iter()) {
            color.validate()?;
        }
        Ok(())
    }
}

/// Flat wire form of [`Brush`], as written in config files and sent to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrushTable {
    pub sizes: Vec<u32>,
    pub default_size: Option<u32>,
    pub size_mode: PickerMode,
    pub colors: Vec<Color>,
    pub default_color: Option<Color>,
    pub color_mode: PickerMode,
    pub antialias: bool,
}

impl Default for BrushTable {
    fn default() -> Self {
        Brush::default().into()
    }
}

impl From<BrushTable> for Brush {
    fn from(t: BrushTable) -> Self {
        Self {
            stroke: StrokeSettings {
                sizes: t.sizes,
                default_size: t.default_size,
                size_mode: t.size_mode,
                antialias: t.antialias,
            },
            colors: t.colors,
            default_color: t.default_color,
            color_mode: t.color_mode,
        }
    }
}

impl From<Brush> for BrushTable {
    fn from(b: Brush) -> Self {
        Self {
            sizes: b.stroke.sizes,
            default_size: b.stroke.default_size,
            size_mode: b.stroke.size_mode,
            colors: b.colors,
            default_color: b.default_color,
            color_mode: b.color_mode,
            antialias: b.stroke.antialias,
        }
    }
}
