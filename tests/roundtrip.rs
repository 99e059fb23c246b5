//! End-to-end conversions through the public API with real image files.
//!
//! Every test writes PNG fixtures into a temp dir, runs them through
//! `preprocess` and `postprocess`, and decodes what lands in the cache.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use image_editor::cache::FileCache;
use image_editor::config::{self, EditorConfig, ImageType};
use image_editor::types::{EditorData, FileData, ImageValue};
use image_editor::{EditorError, ImageEditor};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn checkerboard(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([250, 10, 10])
        } else {
            Rgb([x as u8, y as u8, 200])
        }
    }))
}

fn write_png(dir: &Path, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

fn editor(tmp: &TempDir, toml: &str) -> ImageEditor {
    let config = config::from_toml_str(toml).unwrap();
    ImageEditor::new(config, FileCache::new(tmp.path().join("cache"))).unwrap()
}

fn payload(background: Option<&Path>, layers: &[&Path], composite: Option<&Path>) -> EditorData {
    let file = |p: &Path| FileData::from_path(p.to_str().unwrap());
    EditorData {
        background: background.map(file),
        layers: layers.iter().map(|p| file(*p)).collect(),
        composite: composite.map(file),
    }
}

#[test]
fn roundtrip_preserves_pixels_for_every_type() {
    for image_type in ["numpy", "pil", "filepath"] {
        let tmp = TempDir::new().unwrap();
        let original = checkerboard(17, 11);
        let bg = write_png(tmp.path(), "bg.png", &original);
        let layer = write_png(tmp.path(), "layer.png", &checkerboard(5, 5));
        let editor = editor(&tmp, &format!("type = \"{image_type}\""));

        let data = payload(Some(&bg), &[&layer], Some(&bg));
        let value = editor.preprocess(Some(&data)).unwrap().unwrap();
        let persisted = editor.postprocess(Some(&value)).unwrap().unwrap();

        let bg_out = image::open(persisted.background.unwrap().path).unwrap();
        assert_eq!(bg_out, original, "background differs for type {image_type}");
        let composite_out = image::open(persisted.composite.unwrap().path).unwrap();
        assert_eq!(composite_out, original, "composite differs for type {image_type}");
        assert_eq!(persisted.layers.len(), 1);
        let layer_out = image::open(&persisted.layers[0].path).unwrap();
        assert_eq!(layer_out, checkerboard(5, 5));
    }
}

#[test]
fn preprocess_materializes_configured_type() {
    let tmp = TempDir::new().unwrap();
    let bg = write_png(tmp.path(), "bg.png", &checkerboard(4, 3));

    let cases = [
        ("numpy", "array"),
        ("pil", "image"),
        ("filepath", "path"),
    ];
    for (image_type, kind) in cases {
        let editor = editor(&tmp, &format!("type = \"{image_type}\""));
        let value = editor
            .preprocess(Some(&payload(Some(&bg), &[], None)))
            .unwrap()
            .unwrap();
        assert_eq!(value.background.unwrap().kind(), kind);
        assert_eq!(editor.config().image_type.to_string(), image_type);
    }
}

#[test]
fn preprocess_normalizes_alpha_away_in_rgb_mode() {
    let tmp = TempDir::new().unwrap();
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 40])));
    let bg = write_png(tmp.path(), "bg.png", &rgba);
    let editor = editor(&tmp, "type = \"numpy\"");

    let value = editor
        .preprocess(Some(&payload(Some(&bg), &[], None)))
        .unwrap()
        .unwrap();
    let Some(ImageValue::Array(arr)) = value.background else {
        panic!("expected an array");
    };
    assert_eq!(arr.shape(), (2, 3, 3));
    assert_eq!(arr.get(1, 2, 2), Some(3));
}

#[test]
fn preprocess_grayscale_mode() {
    let tmp = TempDir::new().unwrap();
    let bg = write_png(tmp.path(), "bg.png", &checkerboard(6, 4));
    let editor = editor(&tmp, "type = \"pil\"\nimage_mode = \"L\"");

    let value = editor
        .preprocess(Some(&payload(Some(&bg), &[], None)))
        .unwrap()
        .unwrap();
    let Some(ImageValue::Image(img)) = value.background else {
        panic!("expected an image");
    };
    assert_eq!(img.color(), image::ColorType::L8);
}

#[test]
fn empty_layers_stay_empty() {
    let tmp = TempDir::new().unwrap();
    let editor = editor(&tmp, "");
    let data: EditorData = serde_json::from_str(r#"{"layers": []}"#).unwrap();

    let value = editor.preprocess(Some(&data)).unwrap().unwrap();
    assert!(value.background.is_none());
    assert!(value.layers.is_empty());
    assert!(value.composite.is_none());
}

#[test]
fn absent_background_writes_only_composite() {
    let tmp = TempDir::new().unwrap();
    let composite = write_png(tmp.path(), "composite.png", &checkerboard(8, 8));
    let editor = editor(&tmp, "type = \"pil\"");

    let value = editor
        .preprocess(Some(&payload(None, &[], Some(&composite))))
        .unwrap()
        .unwrap();
    let persisted = editor.postprocess(Some(&value)).unwrap().unwrap();

    assert!(persisted.background.is_none());
    let json = serde_json::to_value(&persisted).unwrap();
    assert!(json["background"].is_null());

    let blobs: Vec<_> = std::fs::read_dir(editor.cache().root())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(blobs.len(), 1, "only the composite should be cached");
}

#[test]
fn missing_input_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let editor = editor(&tmp, "");
    let missing = tmp.path().join("nope.png");

    let result = editor.preprocess(Some(&payload(Some(&missing), &[], None)));
    assert!(matches!(result, Err(EditorError::Imaging(_))));
}

#[test]
fn corrupt_input_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let editor = editor(&tmp, "");
    let corrupt = tmp.path().join("corrupt.png");
    std::fs::write(&corrupt, b"definitely not an image").unwrap();

    let result = editor.preprocess(Some(&payload(None, &[&corrupt], None)));
    assert!(result.is_err());
}

#[test]
fn invalid_sources_fail_construction() {
    let err = config::from_toml_str(r#"sources = ["invalid"]"#).unwrap_err();
    assert!(err.to_string().contains("sources"));

    let ok = config::from_toml_str(r#"sources = ["upload", "clipboard"]"#).unwrap();
    let tmp = TempDir::new().unwrap();
    let editor = ImageEditor::new(ok, FileCache::new(tmp.path())).unwrap();
    let names: Vec<_> = editor.config().sources.iter().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["upload", "clipboard"]);
}

#[test]
fn programmatic_config_defaults_tools() {
    let tmp = TempDir::new().unwrap();
    let config = EditorConfig {
        image_type: ImageType::Path,
        ..EditorConfig::default()
    };
    let editor = ImageEditor::new(config, FileCache::new(tmp.path())).unwrap();
    assert_eq!(editor.config().eraser.sizes, vec![5, 10, 20, 40, 70]);
    assert_eq!(editor.config().brush.colors.len(), 6);
}

#[test]
fn example_formatting() {
    let tmp = TempDir::new().unwrap();
    let editor = editor(&tmp, "");
    assert_eq!(editor.as_example(None), "");
    assert_eq!(editor.as_example(Some("http://x/y.png")), "http://x/y.png");
    let local = editor.as_example(Some("bus.png"));
    assert!(Path::new(&local).is_absolute());
}
