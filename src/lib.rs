//! # Image Editor
//!
//! Server-side half of a web image editor widget. The client widget lets a
//! user upload (or snap, or paste) an image, paint on layers with a brush and
//! an eraser, crop and rotate. All of that happens in the browser. This crate
//! does what the server has to: validate the widget's configuration, and
//! convert editing sessions between the wire form and the form the
//! application works with.
//!
//! # Data Flow
//!
//! ```text
//!             preprocess                        postprocess
//! client ──▶ EditorData ──▶ EditorValue ──▶ app ──▶ EditorValue ──▶ EditorData ──▶ client
//!            (file refs)    (array | image | path)                  (file refs in cache)
//! ```
//!
//! An editing session is a triple: an optional background, an ordered list
//! of layers, and an optional composite (the flattened result).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | The component: preprocess, postprocess, example formatting, frontend props |
//! | [`config`] | `editor.toml` loading and validation |
//! | [`tools`] | Eraser and brush settings |
//! | [`types`] | Wire and in-memory session values |
//! | [`imaging`] | Decode, color-mode normalization, pixel arrays, PNG encode |
//! | [`cache`] | Content-addressed file cache shared by all requests |
//!
//! # Design Decisions
//!
//! ## Output Shape Is an Enum
//!
//! The application picks once, in the config, whether it wants pixel arrays,
//! decoded images, or file paths ([`config::ImageType`]). Inbound conversion
//! produces exactly that variant of [`types::ImageValue`]; outbound conversion
//! accepts any variant, so an application configured for arrays can still
//! return a path.
//!
//! ## PNG-Only Cache Output
//!
//! Everything the editor encodes is PNG. It is lossless, carries every
//! supported color mode (including 16-bit grayscale), and every browser
//! renders it. Paths returned by the application are copied as they are.
//!
//! ## Composition Over Tool Inheritance
//!
//! The brush is not a subtype of the eraser: both share
//! [`tools::StrokeSettings`], the eraser *is* those settings, and the brush
//! embeds them by value next to its color palette.
//!
//! ## No Shared Mutable State
//!
//! Configuration is immutable after construction and every conversion writes
//! new content-addressed files, so one [`editor::ImageEditor`] can serve
//! concurrent requests without locks. Dispatch, cancellation and timeouts
//! belong to the hosting server.

pub mod cache;
pub mod config;
pub mod editor;
pub mod imaging;
pub mod tools;
pub mod types;

pub use editor::{EditorError, ImageEditor};

#[cfg(test)]
pub(crate) mod test_helpers;
