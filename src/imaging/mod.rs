//! Image handling: decode, color-mode normalization, arrays, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with content sniffing |
//! | **Normalize mode** | `DynamicImage::to_*`, `imageops::dither` for bilevel |
//! | **To array** | raw buffer copy into [`ImageArray`] |
//! | **Encode** | PNG via `image::codecs::png` |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Mode**: [`ImageMode`] parsing and conversion
//! - **Array**: [`ImageArray`] and its sample storage

mod array;
pub mod backend;
mod mode;
pub mod rust_backend;

pub use array::{ImageArray, Samples};
pub use backend::{BackendError, ImageBackend};
pub use mode::ImageMode;
pub use rust_backend::RustBackend;
