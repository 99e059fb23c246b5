//! Color mode normalization.
//!
//! Every inbound image is converted to the configured mode before it is
//! materialized, so the application always sees one pixel layout regardless
//! of what the user uploaded.
//!
//! | Mode | Result |
//! |---|---|
//! | `1` | 8-bit luma, Floyd–Steinberg dithered to 0 / 255 |
//! | `L` | 8-bit luma |
//! | `LA` | 8-bit luma + alpha |
//! | `RGB` | 8-bit RGB |
//! | `RGBA` | 8-bit RGBA |
//! | `I;16` | 16-bit luma |

use crate::config::ConfigError;
use image::DynamicImage;
use image::imageops::{self, BiLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageMode {
    Bilevel,
    L,
    La,
    #[default]
    Rgb,
    Rgba,
    I16,
}

impl ImageMode {
    pub const CHOICES: &'static [&'static str] = &["1", "L", "LA", "RGB", "RGBA", "I;16"];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMode::Bilevel => "1",
            ImageMode::L => "L",
            ImageMode::La => "LA",
            ImageMode::Rgb => "RGB",
            ImageMode::Rgba => "RGBA",
            ImageMode::I16 => "I;16",
        }
    }

    /// Number of samples per pixel after conversion.
    pub fn channels(self) -> usize {
        match self {
            ImageMode::Bilevel | ImageMode::L | ImageMode::I16 => 1,
            ImageMode::La => 2,
            ImageMode::Rgb => 3,
            ImageMode::Rgba => 4,
        }
    }

    /// Convert `img` into this mode.
    pub fn convert(self, img: &DynamicImage) -> DynamicImage {
        match self {
            ImageMode::Bilevel => {
                let mut luma = img.to_luma8();
                imageops::dither(&mut luma, &BiLevel);
                DynamicImage::ImageLuma8(luma)
            }
            ImageMode::L => DynamicImage::ImageLuma8(img.to_luma8()),
            ImageMode::La => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
            ImageMode::Rgb => DynamicImage::ImageRgb8(img.to_rgb8()),
            ImageMode::Rgba => DynamicImage::ImageRgba8(img.to_rgba8()),
            ImageMode::I16 => DynamicImage::ImageLuma16(img.to_luma16()),
        }
    }
}

impl FromStr for ImageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(ImageMode::Bilevel),
            "L" => Ok(ImageMode::L),
            "LA" => Ok(ImageMode::La),
            "RGB" => Ok(ImageMode::Rgb),
            "RGBA" => Ok(ImageMode::Rgba),
            "I;16" => Ok(ImageMode::I16),
            other => Err(ConfigError::Validation(format!(
                "Invalid value for parameter `image_mode`: {:?}. Please choose from one of: {:?}",
                other,
                ImageMode::CHOICES
            ))),
        }
    }
}

impl TryFrom<String> for ImageMode {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ImageMode> for String {
    fn from(m: ImageMode) -> Self {
        m.as_str().to_string()
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
