//! Row-major pixel arrays.
//!
//! [`ImageArray`] is the "array" shape handed to applications: samples laid
//! out as `(height, width, channels)`, 8-bit for 8-bit modes and 16-bit for
//! `I;16`. Single-channel images keep an explicit channel axis of 1.

use super::backend::BackendError;
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

/// Sample storage of an [`ImageArray`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArray {
    height: u32,
    width: u32,
    channels: u8,
    samples: Samples,
}

impl ImageArray {
    /// Build an array from raw parts, checking that the sample count matches
    /// the shape.
    pub fn new(
        height: u32,
        width: u32,
        channels: u8,
        samples: Samples,
    ) -> Result<Self, BackendError> {
        if !(1..=4).contains(&channels) {
            return Err(BackendError::ProcessingFailed(format!(
                "Arrays must have 1 to 4 channels, got {channels}"
            )));
        }
        let expected = height as usize * width as usize * channels as usize;
        if samples.len() != expected {
            return Err(BackendError::ProcessingFailed(format!(
                "Array of shape ({height}, {width}, {channels}) needs {expected} samples, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            height,
            width,
            channels,
            samples,
        })
    }

    /// Copy the pixels of `img` into an array.
    ///
    /// 8-bit and 16-bit layouts are kept as they are; float images are
    /// narrowed to 8-bit RGBA.
    pub fn from_image(img: &DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (channels, samples) = match img {
            DynamicImage::ImageLuma8(b) => (1, Samples::U8(b.as_raw().clone())),
            DynamicImage::ImageLumaA8(b) => (2, Samples::U8(b.as_raw().clone())),
            DynamicImage::ImageRgb8(b) => (3, Samples::U8(b.as_raw().clone())),
            DynamicImage::ImageRgba8(b) => (4, Samples::U8(b.as_raw().clone())),
            DynamicImage::ImageLuma16(b) => (1, Samples::U16(b.as_raw().clone())),
            DynamicImage::ImageLumaA16(b) => (2, Samples::U16(b.as_raw().clone())),
            DynamicImage::ImageRgb16(b) => (3, Samples::U16(b.as_raw().clone())),
            DynamicImage::ImageRgba16(b) => (4, Samples::U16(b.as_raw().clone())),
            other => (4, Samples::U8(other.to_rgba8().into_raw())),
        };
        Self {
            height,
            width,
            channels,
            samples,
        }
    }

    /// `(height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Sample at `(row, col, channel)`, widened to `u16`.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u16> {
        let (h, w, c) = self.shape();
        if row >= h || col >= w || channel >= c {
            return None;
        }
        let idx = (row * w + col) * c + channel;
        match &self.samples {
            Samples::U8(v) => v.get(idx).map(|&s| s as u16),
            Samples::U16(v) => v.get(idx).copied(),
        }
    }

    /// Rebuild an image from the array.
    pub fn into_image(self) -> Result<DynamicImage, BackendError> {
        let (w, h) = (self.width, self.height);
        let mismatch = || {
            BackendError::ProcessingFailed(format!(
                "Array samples do not fill a {w}x{h} image"
            ))
        };
        let img = match (self.channels, self.samples) {
            (1, Samples::U8(v)) => DynamicImage::ImageLuma8(
                ImageBuffer::<Luma<u8>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (2, Samples::U8(v)) => DynamicImage::ImageLumaA8(
                ImageBuffer::<LumaA<u8>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (3, Samples::U8(v)) => DynamicImage::ImageRgb8(
                ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (4, Samples::U8(v)) => DynamicImage::ImageRgba8(
                ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (1, Samples::U16(v)) => DynamicImage::ImageLuma16(
                ImageBuffer::<Luma<u16>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (2, Samples::U16(v)) => DynamicImage::ImageLumaA16(
                ImageBuffer::<LumaA<u16>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (3, Samples::U16(v)) => DynamicImage::ImageRgb16(
                ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (4, Samples::U16(v)) => DynamicImage::ImageRgba16(
                ImageBuffer::<Rgba<u16>, _>::from_raw(w, h, v).ok_or_else(mismatch)?,
            ),
            (c, _) => {
                return Err(BackendError::ProcessingFailed(format!(
                    "Arrays must have 1 to 4 channels, got {c}"
                )));
            }
        };
        Ok(img)
    }
}
