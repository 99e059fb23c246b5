//! The image editor component.
//!
//! [`ImageEditor`] owns a validated [`EditorConfig`], a [`FileCache`] and an
//! [`ImageBackend`]. It converts in both directions between the wire form
//! ([`EditorData`]) and the application's in-memory form ([`EditorValue`]):
//!
//! ```text
//! preprocess   EditorData  →  EditorValue   (open, normalize mode, materialize)
//! postprocess  EditorValue →  EditorData    (encode or copy into the cache)
//! ```
//!
//! Both directions are stateless: the only thing they read besides their
//! input is the immutable configuration, and the only thing they write is new
//! content-addressed files in the cache.

use crate::cache::{ENCODED_IMAGE_NAME, FileCache};
use crate::config::{ConfigError, EditorConfig, ImageType};
use crate::imaging::{BackendError, ImageArray, ImageBackend, RustBackend};
use crate::types::{EditorData, EditorValue, FileData, ImageValue};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Sample value returned by [`ImageEditor::example_inputs`].
pub const EXAMPLE_INPUT_URL: &str =
    "https://raw.githubusercontent.com/gradio-app/gradio/main/test/test_files/bus.png";

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

pub struct ImageEditor<B: ImageBackend = RustBackend> {
    config: EditorConfig,
    cache: FileCache,
    backend: B,
}

impl ImageEditor<RustBackend> {
    /// Validate `config` and build an editor backed by the `image` crate.
    pub fn new(config: EditorConfig, cache: FileCache) -> Result<Self, EditorError> {
        Self::with_backend(config, cache, RustBackend::new())
    }
}

impl<B: ImageBackend> ImageEditor<B> {
    /// Validate `config` and build an editor using a specific backend
    /// (allows testing with a mock).
    pub fn with_backend(
        config: EditorConfig,
        cache: FileCache,
        backend: B,
    ) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self {
            config,
            cache,
            backend,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Convert an inbound payload into the configured in-memory shape.
    ///
    /// Absent fields stay absent, and an absent or empty layer list becomes an
    /// empty `Vec`. A missing or undecodable file fails the whole conversion.
    pub fn preprocess(
        &self,
        data: Option<&EditorData>,
    ) -> Result<Option<EditorValue>, EditorError> {
        let Some(data) = data else {
            return Ok(None);
        };
        info!(
            layers = data.layers.len(),
            image_type = %self.config.image_type,
            image_mode = %self.config.image_mode,
            "preprocessing editor value"
        );

        let background = data
            .background
            .as_ref()
            .map(|f| self.load("background", f))
            .transpose()?;
        let layers = data
            .layers
            .iter()
            .map(|f| self.load("layer", f))
            .collect::<Result<Vec<_>, _>>()?;
        let composite = data
            .composite
            .as_ref()
            .map(|f| self.load("composite", f))
            .transpose()?;

        Ok(Some(EditorValue {
            background,
            layers,
            composite,
        }))
    }

    /// Persist an in-memory value into the cache and describe it for the client.
    ///
    /// Absent fields produce no file and serialize as `null`.
    pub fn postprocess(
        &self,
        value: Option<&EditorValue>,
    ) -> Result<Option<EditorData>, EditorError> {
        let Some(value) = value else {
            return Ok(None);
        };
        info!(layers = value.layers.len(), "postprocessing editor value");

        let background = value
            .background
            .as_ref()
            .map(|v| self.persist("background", v))
            .transpose()?;
        let layers = value
            .layers
            .iter()
            .map(|v| self.persist("layer", v))
            .collect::<Result<Vec<_>, _>>()?;
        let composite = value
            .composite
            .as_ref()
            .map(|v| self.persist("composite", v))
            .transpose()?;

        Ok(Some(EditorData {
            background,
            layers,
            composite,
        }))
    }

    /// Format a value for the examples table.
    ///
    /// Remote URLs (and every value when `root_url` is set) pass through
    /// unchanged; local paths are made absolute. An empty path resolves to
    /// the working directory.
    pub fn as_example(&self, input: Option<&str>) -> String {
        let Some(input) = input else {
            return String::new();
        };
        if self.config.root_url.is_some() || is_http_url_like(input) {
            return input.to_string();
        }
        let absolute = if input.is_empty() {
            std::env::current_dir()
        } else {
            std::path::absolute(input)
        };
        absolute
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| input.to_string())
    }

    /// A value suitable for documentation and API examples.
    pub fn example_inputs(&self) -> &'static str {
        EXAMPLE_INPUT_URL
    }

    /// Props sent to the client widget: the configuration with the share
    /// button resolved, tagged with the component name.
    pub fn frontend_props(&self) -> Result<serde_json::Value, EditorError> {
        let mut props = serde_json::to_value(&self.config)?;
        if let Some(obj) = props.as_object_mut() {
            obj.insert(
                "show_share_button".into(),
                self.config.resolved_show_share_button().into(),
            );
            obj.insert("name".into(), "imageeditor".into());
        }
        Ok(props)
    }

    fn load(&self, field: &str, file: &FileData) -> Result<ImageValue, EditorError> {
        let path = Path::new(&file.path);
        let img = self.backend.open(path)?;
        let img = self.config.image_mode.convert(&img);
        debug!(
            field,
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "loaded image"
        );
        self.materialize(img)
    }

    fn materialize(&self, img: DynamicImage) -> Result<ImageValue, EditorError> {
        Ok(match self.config.image_type {
            ImageType::Array => {
                let arr = ImageArray::from_image(&img);
                debug_assert_eq!(arr.shape().2, self.config.image_mode.channels());
                arr.into()
            }
            ImageType::Image => img.into(),
            ImageType::Path => {
                let bytes = self.backend.encode_png(&img)?;
                self.cache.store_bytes(&bytes, ENCODED_IMAGE_NAME)?.into()
            }
        })
    }

    fn persist(&self, field: &str, value: &ImageValue) -> Result<FileData, EditorError> {
        let file = match value {
            ImageValue::Array(arr) => self.store_image(&arr.clone().into_image()?)?,
            ImageValue::Image(img) => self.store_image(img)?,
            ImageValue::Path(source) => {
                let stored = self.cache.store_file(source)?;
                let size = std::fs::metadata(&stored)?.len();
                FileData {
                    path: path_string(&stored)?,
                    url: None,
                    size: Some(size),
                    orig_name: source
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned()),
                    mime_type: mime_type_for(source).map(str::to_string),
                }
            }
        };
        debug!(field, kind = value.kind(), path = %file.path, "persisted image");
        Ok(file)
    }

    fn store_image(&self, img: &DynamicImage) -> Result<FileData, EditorError> {
        let bytes = self.backend.encode_png(img)?;
        let stored = self.cache.store_bytes(&bytes, ENCODED_IMAGE_NAME)?;
        Ok(FileData {
            path: path_string(&stored)?,
            url: None,
            size: Some(bytes.len() as u64),
            orig_name: Some(ENCODED_IMAGE_NAME.to_string()),
            mime_type: Some("image/png".to_string()),
        })
    }
}

/// Whether `s` looks like an `http(s)` URL rather than a local path.
pub fn is_http_url_like(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn path_string(path: &Path) -> Result<String, EditorError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| EditorError::NonUtf8Path(path.to_path_buf()))
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "gif" => "image/gif",
        _ => return None,
    })
}
