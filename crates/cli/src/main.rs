#![deny(unsafe_code)]
//! CLI binary for the dotscape pixelation renderer.
//!
//! Subcommands:
//! - `render [image]`: pixelate an image once, write a PNG
//! - `animate [image]`: drive the pointer along a path, write PNG frames
//! - `schema`: print the configuration schema
//! - `list`: print presets, themes and pointer paths

mod error;

use clap::{Args, Parser, Subcommand};
use dotscape_core::{PixelateConfig, SourceImage, Theme, ThemeContext, TileSources};
use dotscape_render::image_source::DecodedImage;
use dotscape_render::snapshot::write_png;
use dotscape_render::{animate, render_still, PointerPath};
use error::CliError;
use log::info;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Environment variable holding the stored theme preference.
const THEME_ENV: &str = "DOTSCAPE_THEME";

#[derive(Parser)]
#[command(name = "dotscape", about = "Pointer-reactive image pixelation")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Source selection and configuration shared by `render` and `animate`.
#[derive(Args)]
struct SourceArgs {
    /// Source image path (PNG, JPEG or WebP). Takes precedence over the
    /// themed variants.
    image: Option<PathBuf>,

    /// Source image used with the dark theme.
    #[arg(long)]
    src_dark: Option<PathBuf>,

    /// Source image used with the light theme.
    #[arg(long)]
    src_light: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 320)]
    width: usize,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 320)]
    height: usize,

    /// Base preset (canvas, tile).
    #[arg(long, default_value = "canvas")]
    preset: String,

    /// Theme (light, dark). Defaults to $DOTSCAPE_THEME, then light.
    #[arg(long)]
    theme: Option<String>,

    /// JSON file of config overrides, applied over the preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Config overrides as a JSON string, applied last.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Treat the image as unreadable, forcing the plain-image fallback.
    #[arg(long)]
    no_readback: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Pixelate an image once and write a PNG.
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// Animate the pointer along a path and write one PNG per frame.
    Animate {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of frames to write.
        #[arg(short = 'n', long, default_value_t = 60)]
        frames: usize,

        /// Pointer path (orbit, sweep, center).
        #[arg(short, long, default_value = "orbit")]
        path: String,

        /// Directory for frame_NNNN.png files; created if missing.
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// Print the configuration schema.
    Schema,
    /// List presets, themes and pointer paths.
    List,
}

/// Resolves the theme: explicit flag, else the stored preference.
fn resolve_theme(flag: Option<&str>) -> Result<Theme, CliError> {
    match flag {
        Some(name) => Ok(Theme::parse(name)?),
        None => {
            let stored = std::env::var(THEME_ENV).ok();
            Ok(ThemeContext::init(stored.as_deref()).theme())
        }
    }
}

/// Preset, then config file, then `--params`, then the theme's tint default.
fn resolve_config(args: &SourceArgs, theme: Theme) -> Result<PixelateConfig, CliError> {
    let mut config = PixelateConfig::preset(&args.preset)?;

    if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
        let overrides: Value = serde_json::from_str(&text)
            .map_err(|e| CliError::Input(format!("invalid config file {}: {e}", path.display())))?;
        config = config.with_overrides(&overrides)?;
    }

    let params: Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    config = config.with_overrides(&params)?;

    Ok(theme.apply(&config))
}

fn resolve_source(args: &SourceArgs, theme: Theme) -> Result<PathBuf, CliError> {
    let sources = TileSources {
        src: args.image.as_ref().map(|p| p.display().to_string()),
        src_dark: args.src_dark.as_ref().map(|p| p.display().to_string()),
        src_light: args.src_light.as_ref().map(|p| p.display().to_string()),
    };
    sources
        .resolve(theme)
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Input("no source image: pass IMAGE, --src-dark or --src-light".into()))
}

fn load_image(path: &Path, no_readback: bool) -> Result<Box<dyn SourceImage>, CliError> {
    let image = DecodedImage::open(path)?;
    Ok(if no_readback {
        Box::new(image.without_readback())
    } else {
        Box::new(image)
    })
}

fn state_name(state: dotscape_core::DriverState) -> String {
    format!("{state:?}").to_lowercase()
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&PixelateConfig::param_schema())?
            );
        }
        Command::List => {
            let presets = ["canvas", "tile"];
            let themes = ["light", "dark"];
            let paths = PointerPath::list_names();
            if cli.json {
                let info = json!({
                    "presets": presets,
                    "themes": themes,
                    "paths": paths,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Presets: {}", presets.join(", "));
                println!("Themes:  {}", themes.join(", "));
                println!("Paths:   {}", paths.join(", "));
            }
        }
        Command::Render { source, output } => {
            let theme = resolve_theme(source.theme.as_deref())?;
            let config = resolve_config(&source, theme)?;
            let image_path = resolve_source(&source, theme)?;
            let image = load_image(&image_path, source.no_readback)?;

            let still = render_still(image, &config, source.width, source.height)?;
            write_png(&still.raster, &output)?;

            if cli.json {
                let info = json!({
                    "image": image_path.display().to_string(),
                    "width": source.width,
                    "height": source.height,
                    "state": state_name(still.state),
                    "dots": still.dots,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                info!(
                    "rendered {} ({}x{}, {} dots, {}) -> {}",
                    image_path.display(),
                    source.width,
                    source.height,
                    still.dots,
                    state_name(still.state),
                    output.display()
                );
            }
        }
        Command::Animate {
            source,
            frames,
            path,
            out_dir,
        } => {
            let pointer_path = PointerPath::from_name(&path)?;
            let theme = resolve_theme(source.theme.as_deref())?;
            let config = resolve_config(&source, theme)?;
            let image_path = resolve_source(&source, theme)?;
            let image = load_image(&image_path, source.no_readback)?;

            fs::create_dir_all(&out_dir)
                .map_err(|e| CliError::Io(format!("{}: {e}", out_dir.display())))?;
            let report = animate(
                image,
                &config,
                source.width,
                source.height,
                frames,
                pointer_path,
                |index, raster| write_png(raster, &out_dir.join(format!("frame_{index:04}.png"))),
            )?;

            if cli.json {
                let info = json!({
                    "image": image_path.display().to_string(),
                    "width": source.width,
                    "height": source.height,
                    "path": path,
                    "frames": report.frames_written,
                    "state": state_name(report.state),
                    "out_dir": out_dir.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                info!(
                    "wrote {} frames of {} ({}x{}, path {path}) -> {}",
                    report.frames_written,
                    image_path.display(),
                    source.width,
                    source.height,
                    out_dir.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
