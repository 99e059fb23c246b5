//! Values exchanged with the client and with the application.
//!
//! [`EditorData`] is the wire form: every image is a [`FileData`] pointing at
//! a file the server can read. [`EditorValue`] is the in-memory form handed
//! to the application, with each image materialized as an [`ImageValue`].

use crate::imaging::ImageArray;
use image::DynamicImage;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Transport-safe reference to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// File size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileData {
    /// Reference carrying only a path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: None,
            size: None,
            orig_name: None,
            mime_type: None,
        }
    }
}

/// Accepts either a full file object or a bare path string.
fn file_data_or_path<'de, D>(deserializer: D) -> Result<Option<FileData>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FileOrPath {
        File(FileData),
        Path(String),
    }

    Ok(
        Option::<FileOrPath>::deserialize(deserializer)?.map(|v| match v {
            FileOrPath::File(f) => f,
            FileOrPath::Path(p) => FileData::from_path(p),
        }),
    )
}

/// `null` and a missing key both mean "no layers".
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<FileData>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<FileData>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wire form of an editing session: background, layers, composite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorData {
    #[serde(default, deserialize_with = "file_data_or_path")]
    pub background: Option<FileData>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub layers: Vec<FileData>,
    #[serde(default, deserialize_with = "file_data_or_path")]
    pub composite: Option<FileData>,
}

/// An image materialized for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageValue {
    Array(ImageArray),
    Image(DynamicImage),
    Path(PathBuf),
}

impl ImageValue {
    /// Short label of the variant, used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageValue::Array(_) => "array",
            ImageValue::Image(_) => "image",
            ImageValue::Path(_) => "path",
        }
    }
}

impl From<ImageArray> for ImageValue {
    fn from(a: ImageArray) -> Self {
        ImageValue::Array(a)
    }
}

impl From<DynamicImage> for ImageValue {
    fn from(img: DynamicImage) -> Self {
        ImageValue::Image(img)
    }
}

impl From<PathBuf> for ImageValue {
    fn from(p: PathBuf) -> Self {
        ImageValue::Path(p)
    }
}

/// In-memory form of an editing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorValue {
    pub background: Option<ImageValue>,
    pub layers: Vec<ImageValue>,
    pub composite: Option<ImageValue>,
}
