use clap::{Parser, Subcommand};
use image_editor::cache::FileCache;
use image_editor::config::{self, EditorConfig};
use image_editor::imaging::rust_backend::supported_input_extensions;
use image_editor::types::{EditorData, EditorValue, ImageValue};
use image_editor::ImageEditor;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-editor")]
#[command(about = "Validate image editor configs and convert editor payloads")]
#[command(long_about = "\
Validate image editor configs and convert editor payloads

A payload is the JSON the client widget sends for one editing session:

  {
    \"background\": {\"path\": \"/uploads/photo.jpg\"},
    \"layers\": [{\"path\": \"/uploads/layer-0.png\"}],
    \"composite\": {\"path\": \"/uploads/composite.png\"}
  }

Every key is optional. Converted images are written to the cache directory
(--cache-dir, else $IMAGE_EDITOR_CACHE_DIR, else a directory under the
system temp dir).

Set RUST_LOG=debug to trace each converted image.

Run 'image-editor gen-config' to generate a documented editor.toml.")]
#[command(version)]
struct Cli {
    /// Editor config file (defaults apply when it does not exist)
    #[arg(long, default_value = "editor.toml", global = true)]
    config: PathBuf,

    /// Cache directory for converted images
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the config and print a summary
    Check,
    /// Print a stock editor.toml with all options documented
    GenConfig,
    /// Print the props sent to the client widget
    Props,
    /// Convert a payload into the configured in-memory shape
    Preprocess {
        /// Payload JSON file
        payload: PathBuf,
    },
    /// Convert a payload in and back out, printing the persisted payload
    Roundtrip {
        /// Payload JSON file
        payload: PathBuf,
    },
    /// Format a value for the examples table
    Example {
        /// Local path or URL; omit for an empty example
        value: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Check => {
            let editor = build_editor(&cli)?;
            print_summary(editor.config(), &cli.config);
            println!("Cache:   {}", editor.cache().root().display());
            println!("Decoders: {}", supported_input_extensions().join(", "));
            println!("==> Config is valid");
        }
        Command::Props => {
            let editor = build_editor(&cli)?;
            println!("{}", serde_json::to_string_pretty(&editor.frontend_props()?)?);
        }
        Command::Preprocess { payload } => {
            let editor = build_editor(&cli)?;
            let data = read_payload(payload)?;
            let value = editor.preprocess(Some(&data))?;
            let summary = value.as_ref().map(describe_value);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Roundtrip { payload } => {
            let editor = build_editor(&cli)?;
            let data = read_payload(payload)?;
            let value = editor.preprocess(Some(&data))?;
            let persisted = editor.postprocess(value.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&persisted)?);
        }
        Command::Example { value } => {
            let editor = build_editor(&cli)?;
            println!("{}", editor.as_example(value.as_deref()));
        }
    }

    Ok(())
}

fn build_editor(cli: &Cli) -> Result<ImageEditor, Box<dyn std::error::Error>> {
    let editor_config = config::load_config(&cli.config)?;
    let cache = match &cli.cache_dir {
        Some(dir) => FileCache::new(dir),
        None => FileCache::from_env(),
    };
    Ok(ImageEditor::new(editor_config, cache)?)
}

fn read_payload(path: &Path) -> Result<EditorData, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_summary(config: &EditorConfig, path: &Path) {
    let sources: Vec<_> = config.sources.iter().map(|s| s.as_str()).collect();
    let transforms: Vec<_> = config.transforms.iter().map(|t| t.as_str()).collect();
    let source = if path.exists() {
        path.display().to_string()
    } else {
        "(defaults)".to_string()
    };
    println!("Config:  {source}");
    println!("Type:    {}", config.image_type);
    println!("Mode:    {}", config.image_mode);
    println!("Sources: {}", sources.join(", "));
    println!("Tools:   {}", transforms.join(", "));
    println!(
        "Eraser:  sizes {:?} ({:?})",
        config.eraser.sizes, config.eraser.size_mode
    );
    let colors: Vec<_> = config.brush.colors.iter().map(|c| c.to_string()).collect();
    println!(
        "Brush:   sizes {:?}, colors [{}]",
        config.brush.stroke.sizes,
        colors.join(", ")
    );
}

fn describe_value(value: &EditorValue) -> serde_json::Value {
    json!({
        "background": value.background.as_ref().map(describe_image),
        "layers": value.layers.iter().map(describe_image).collect::<Vec<_>>(),
        "composite": value.composite.as_ref().map(describe_image),
    })
}

fn describe_image(image: &ImageValue) -> serde_json::Value {
    match image {
        ImageValue::Array(arr) => {
            let (h, w, c) = arr.shape();
            json!({ "kind": image.kind(), "shape": [h, w, c] })
        }
        ImageValue::Image(img) => json!({
            "kind": image.kind(),
            "width": img.width(),
            "height": img.height(),
            "color": format!("{:?}", img.color()),
        }),
        ImageValue::Path(p) => json!({ "kind": image.kind(), "path": p.display().to_string() }),
    }
}
