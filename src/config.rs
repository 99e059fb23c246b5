//! Component configuration.
//!
//! Handles loading and validating the editor configuration. The configuration
//! is fixed when the component is constructed and never changes afterwards.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! image_mode = "RGB"                          # 1, L, LA, RGB, RGBA, I;16
//! sources = ["upload", "webcam", "clipboard"]
//! type = "numpy"                              # numpy | pil | filepath
//! data_mode = "image"                         # image | pathline
//! transforms = ["crop", "rotate"]
//! # height = 480
//! # width = 640
//! # crop_size = "16:9"                        # or [640, 360]
//!
//! [eraser]
//! sizes = [5, 10, 20, 40, 70]
//!
//! [brush]
//! colors = ["red", "green", "blue", "yellow", "black", "white"]
//! ```
//!
//! Enumerated values are checked while parsing, so a typo such as
//! `sources = ["uplaod"]` fails with the list of accepted values. Unknown
//! keys are rejected as well.

use crate::imaging::ImageMode;
use crate::tools::{Brush, Eraser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Builds the `FromStr`/`Display` pair for a string-valued config enum.
///
/// Parsing failures name the config key and list every accepted spelling, and
/// serde goes through the same parser so file and code paths report alike.
macro_rules! config_enum {
    ($name:ident, $key:literal, { $($variant:ident => [$canonical:literal $(, $alias:literal)*]),+ $(,)? }) => {
        impl $name {
            pub const CHOICES: &'static [&'static str] = &[$($canonical),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($canonical $(| $alias)* => Ok($name::$variant),)+
                    other => Err(ConfigError::Validation(format!(
                        "Invalid value for parameter `{}`: {:?}. Please choose from one of: {:?}",
                        $key,
                        other,
                        $name::CHOICES
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConfigError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Shape handed to the application for each inbound image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageType {
    /// `(height, width, channels)` pixel samples.
    #[default]
    Array,
    /// A decoded [`image::DynamicImage`].
    Image,
    /// Path of a PNG written to the cache.
    Path,
}

config_enum!(ImageType, "type", {
    Array => ["numpy", "array"],
    Image => ["pil", "image"],
    Path => ["filepath", "path"],
});

/// Where the client lets the user take an image from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Source {
    Upload,
    Webcam,
    Clipboard,
}

config_enum!(Source, "sources", {
    Upload => ["upload"],
    Webcam => ["webcam"],
    Clipboard => ["clipboard"],
});

/// Client-side transform tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Transform {
    Crop,
    Rotate,
}

config_enum!(Transform, "transforms", {
    Crop => ["crop"],
    Rotate => ["rotate"],
});

/// What the client sends back: rendered images, or raw stroke paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataMode {
    #[default]
    Image,
    Pathline,
}

config_enum!(DataMode, "data_mode", {
    Image => ["image"],
    Pathline => ["pathline"],
});

/// A single string or a list of strings; config files may use either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Parse each string after the untagged match, so a bad value reports its
/// own error instead of serde's generic "no variant matched".
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    };
    raw.iter()
        .map(|s| s.parse().map_err(<D::Error as serde::de::Error>::custom))
        .collect()
}

/// Fixed crop box, either as pixel dimensions or as a `width:height` ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CropSize {
    Pixels([f64; 2]),
    Ratio(String),
}

impl CropSize {
    /// Width and height of the crop box; for ratios these are the ratio terms.
    pub fn dimensions(&self) -> Result<(f64, f64), ConfigError> {
        let (w, h) = match self {
            CropSize::Pixels([w, h]) => (*w, *h),
            CropSize::Ratio(s) => {
                let (w, h) = s.split_once(':').ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "crop_size ratio must look like \"width:height\", got {s:?}"
                    ))
                })?;
                let parse = |part: &str| {
                    part.trim().parse::<f64>().map_err(|_| {
                        ConfigError::Validation(format!(
                            "crop_size ratio {s:?} contains a non-numeric term"
                        ))
                    })
                };
                (parse(w)?, parse(h)?)
            }
        };
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ConfigError::Validation(format!(
                "crop_size terms must be positive, got {w}x{h}"
            )));
        }
        Ok((w, h))
    }
}

/// Image editor configuration.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Displayed height in pixels.
    pub height: Option<u32>,
    /// Displayed width in pixels.
    pub width: Option<u32>,
    /// Color mode every inbound image is converted to.
    pub image_mode: ImageMode,
    /// Where the user can take an image from.
    #[serde(deserialize_with = "one_or_many")]
    pub sources: Vec<Source>,
    /// Shape of inbound values handed to the application.
    #[serde(rename = "type")]
    pub image_type: ImageType,
    pub label: Option<String>,
    pub show_label: Option<bool>,
    pub show_download_button: bool,
    /// Wrap the widget in a padded container.
    pub container: bool,
    /// Relative width compared to sibling components in a row.
    pub scale: Option<u32>,
    pub min_width: u32,
    /// `None` lets the host infer it from whether the widget is an input.
    pub interactive: Option<bool>,
    pub visible: bool,
    pub elem_id: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub elem_classes: Vec<String>,
    pub render: bool,
    /// Remote app this component belongs to. Examples are never resolved
    /// against the local filesystem when set.
    pub root_url: Option<String>,
    pub mirror_webcam: bool,
    /// `None` shows the button only when running on a hosted Space.
    pub show_share_button: Option<bool>,
    pub data_mode: DataMode,
    pub crop_size: Option<CropSize>,
    #[serde(deserialize_with = "one_or_many")]
    pub transforms: Vec<Transform>,
    pub eraser: Eraser,
    pub brush: Brush,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            height: None,
            width: None,
            image_mode: ImageMode::Rgb,
            sources: vec![Source::Upload, Source::Webcam, Source::Clipboard],
            image_type: ImageType::Array,
            label: None,
            show_label: None,
            show_download_button: true,
            container: true,
            scale: None,
            min_width: 160,
            interactive: None,
            visible: true,
            elem_id: None,
            elem_classes: Vec::new(),
            render: true,
            root_url: None,
            mirror_webcam: true,
            show_share_button: None,
            data_mode: DataMode::Image,
            crop_size: None,
            transforms: vec![Transform::Crop, Transform::Rotate],
            eraser: Eraser::default(),
            brush: Brush::default(),
        }
    }
}

impl EditorConfig {
    /// Validate values that the type system alone cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(crop) = &self.crop_size {
            crop.dimensions()?;
        }
        if self.height == Some(0) || self.width == Some(0) {
            return Err(ConfigError::Validation(
                "height and width must be positive when set".into(),
            ));
        }
        self.eraser.validate("eraser")?;
        self.brush.validate()?;
        Ok(())
    }

    /// Parse sources given as plain strings, as they arrive from code that
    /// builds the component programmatically.
    pub fn parse_sources<I, S>(sources: I) -> Result<Vec<Source>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        sources.into_iter().map(|s| s.as_ref().parse()).collect()
    }

    /// Whether the share button is shown, resolving the "auto" setting from
    /// the environment.
    pub fn resolved_show_share_button(&self) -> bool {
        self.show_share_button.unwrap_or_else(running_on_space)
    }
}

/// True when running on a hosted Space (`SYSTEM=spaces`).
pub fn running_on_space() -> bool {
    std::env::var("SYSTEM").is_ok_and(|v| v == "spaces")
}

/// Parse and validate a config from TOML text.
pub fn from_toml_str(content: &str) -> Result<EditorConfig, ConfigError> {
    let config: EditorConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    if !path.exists() {
        return Ok(EditorConfig::default());
    }
    let content = fs::read_to_string(path)?;
    from_toml_str(&content)
}

/// Returns a fully-commented stock `editor.toml` with all keys and their
/// default values.
pub fn stock_config_toml() -> &'static str {
    r##"# Image editor configuration
# All options are optional - remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Displayed size in pixels. Omit to size to the container.
# height = 480
# width = 640

# Color mode every inbound image is converted to:
# "1" (dithered black and white), "L" (grayscale), "LA" (grayscale + alpha),
# "RGB", "RGBA", "I;16" (16-bit grayscale)
image_mode = "RGB"

# Where the user can take an image from: any of upload, webcam, clipboard
sources = ["upload", "webcam", "clipboard"]

# What the application receives for each image:
# "numpy"    - pixel array shaped (height, width, channels)
# "pil"      - decoded image object
# "filepath" - path to a PNG in the cache directory
type = "numpy"

# label = "Image"
# show_label = true
show_download_button = true
container = true
# scale = 1
min_width = 160
# interactive = true
visible = true
# elem_id = "editor"
elem_classes = []
render = true
# root_url = "https://example.com/app"
mirror_webcam = true
# show_share_button = false

# "image" returns rendered images, "pathline" returns stroke paths
data_mode = "image"

# Fixed crop box: [width, height] in pixels, or a "width:height" ratio
# crop_size = "1:1"

# Transform tools offered to the user: crop, rotate
transforms = ["crop", "rotate"]

[eraser]
sizes = [5, 10, 20, 40, 70]
default_size = 20
# "fixed" offers only the listed sizes, "defaults" also allows custom sizes
size_mode = "defaults"
antialias = true

[brush]
sizes = [5, 10, 20, 40, 70]
default_size = 20
size_mode = "defaults"
# CSS color strings or [r, g, b, a] quadruples
colors = ["red", "green", "blue", "yellow", "black", "white"]
default_color = "red"
# "fixed" offers only the listed colors, "defaults" also allows a color picker
color_mode = "defaults"
antialias = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::PickerMode;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let c = EditorConfig::default();
        assert_eq!(c.image_mode, ImageMode::Rgb);
        assert_eq!(c.image_type, ImageType::Array);
        assert_eq!(
            c.sources,
            vec![Source::Upload, Source::Webcam, Source::Clipboard]
        );
        assert_eq!(c.transforms, vec![Transform::Crop, Transform::Rotate]);
        assert_eq!(c.min_width, 160);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let c = from_toml_str("").unwrap();
        assert_eq!(c.sources.len(), 3);
        assert_eq!(c.eraser, Eraser::default());
        assert_eq!(c.brush, Brush::default());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let c = from_toml_str(stock_config_toml()).unwrap();
        let d = EditorConfig::default();
        assert_eq!(c.sources, d.sources);
        assert_eq!(c.image_type, d.image_type);
        assert_eq!(c.eraser, d.eraser);
        assert_eq!(c.brush, d.brush);
        assert_eq!(c.data_mode, d.data_mode);
    }

    #[test]
    fn invalid_source_rejected() {
        let err = from_toml_str(r#"sources = ["invalid"]"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("sources"), "{err}");
        assert!(err.contains("upload"), "{err}");
    }

    #[test]
    fn invalid_source_rejected_from_strings() {
        let result = EditorConfig::parse_sources(["invalid"]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn valid_source_subset_kept_verbatim() {
        let c = from_toml_str(r#"sources = ["clipboard", "upload"]"#).unwrap();
        assert_eq!(c.sources, vec![Source::Clipboard, Source::Upload]);

        let parsed = EditorConfig::parse_sources(["webcam"]).unwrap();
        assert_eq!(parsed, vec![Source::Webcam]);
    }

    #[test]
    fn single_source_string_accepted() {
        let c = from_toml_str(r#"sources = "webcam""#).unwrap();
        assert_eq!(c.sources, vec![Source::Webcam]);
    }

    #[test]
    fn empty_sources_accepted() {
        let c = from_toml_str("sources = []").unwrap();
        assert!(c.sources.is_empty());
    }

    #[test]
    fn invalid_type_rejected() {
        let err = from_toml_str(r#"type = "tensor""#).unwrap_err().to_string();
        assert!(err.contains("`type`"), "{err}");
        assert!(err.contains("filepath"), "{err}");
    }

    #[test]
    fn type_aliases() {
        assert_eq!("numpy".parse::<ImageType>().unwrap(), ImageType::Array);
        assert_eq!("array".parse::<ImageType>().unwrap(), ImageType::Array);
        assert_eq!("pil".parse::<ImageType>().unwrap(), ImageType::Image);
        assert_eq!("filepath".parse::<ImageType>().unwrap(), ImageType::Path);
        assert_eq!(ImageType::Path.to_string(), "filepath");
    }

    #[test]
    fn unsupported_image_mode_rejected() {
        assert!(from_toml_str(r#"image_mode = "CMYK""#).is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let result = from_toml_str("heigth = 300");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"), "{err}");
    }

    #[test]
    fn crop_size_forms() {
        let c = from_toml_str(r#"crop_size = "16:9""#).unwrap();
        assert_eq!(c.crop_size.unwrap().dimensions().unwrap(), (16.0, 9.0));

        let c = from_toml_str("crop_size = [640, 360]").unwrap();
        assert_eq!(c.crop_size.unwrap().dimensions().unwrap(), (640.0, 360.0));
    }

    #[test]
    fn malformed_crop_size_rejected() {
        assert!(from_toml_str(r#"crop_size = "16x9""#).is_err());
        assert!(from_toml_str(r#"crop_size = "a:b""#).is_err());
        assert!(from_toml_str("crop_size = [0, 10]").is_err());
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(from_toml_str("width = 0").is_err());
    }

    #[test]
    fn tool_tables_parse() {
        let c = from_toml_str(
            r#"
[eraser]
sizes = [8]
size_mode = "fixed"

[brush]
colors = ["black"]
color_mode = "fixed"
default_color = "black"
"#,
        )
        .unwrap();
        assert_eq!(c.eraser.sizes, vec![8]);
        assert_eq!(c.eraser.size_mode, PickerMode::Fixed);
        assert_eq!(c.brush.color_mode, PickerMode::Fixed);
        assert_eq!(c.brush.stroke.sizes, vec![5, 10, 20, 40, 70]);
    }

    #[test]
    fn invalid_tool_table_rejected() {
        assert!(from_toml_str("[eraser]\nsizes = [0]").is_err());
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let c = load_config(&tmp.path().join("editor.toml")).unwrap();
        assert_eq!(c.image_type, ImageType::Array);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("editor.toml");
        fs::write(&path, "type = \"filepath\"\nimage_mode = \"L\"\n").unwrap();
        let c = load_config(&path).unwrap();
        assert_eq!(c.image_type, ImageType::Path);
        assert_eq!(c.image_mode, ImageMode::L);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("editor.toml");
        fs::write(&path, "type = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn explicit_share_button_wins() {
        let c = EditorConfig {
            show_share_button: Some(true),
            ..EditorConfig::default()
        };
        assert!(c.resolved_show_share_button());
    }

    #[test]
    fn config_serializes_with_wire_names() {
        let json = serde_json::to_value(EditorConfig::default()).unwrap();
        assert_eq!(json["type"], "numpy");
        assert_eq!(json["image_mode"], "RGB");
        assert_eq!(json["sources"][1], "webcam");
        assert_eq!(json["brush"]["colors"][0], "red");
    }
}
