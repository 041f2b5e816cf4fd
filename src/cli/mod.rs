//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod convert;
mod info;
mod render;
mod stats;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use glob::glob;

use crate::config::{self, CliOverrides, PlacerConfig};
use crate::export::{decode_text, TextFormat};
use crate::grid::MAX_GRID_SIZE;
use crate::palette::Palette;
use crate::palettes;

pub use info::PaletteAction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Image extensions accepted by `convert` when expanding directories.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Check if a path looks like an image the decoder can read.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand CLI inputs: plain paths, glob patterns, and directories.
///
/// Directories contribute every image file directly inside them. Patterns
/// that match nothing are returned as-is so the caller can report them.
pub fn expand_inputs(inputs: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            let pattern = format!("{}/*", path.display());
            if let Ok(paths) = glob(&pattern) {
                files.extend(paths.filter_map(Result::ok).filter(|p| is_image_file(p)));
            }
            continue;
        }
        match glob(input) {
            Ok(paths) => {
                let matched: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
                if matched.is_empty() {
                    files.push(path.to_path_buf());
                } else {
                    files.extend(matched);
                }
            }
            Err(_) => files.push(path.to_path_buf()),
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Pixel Placer - palette-constrained pixel art grids from images
#[derive(Parser)]
#[command(name = "placer")]
#[command(about = "Pixel Placer - convert images into palette-constrained pixel art grids")]
#[command(version)]
pub struct Cli {
    /// Path to placer.toml (default: search upward from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Quantize images into palette grids
    Convert {
        /// Input images or glob patterns (e.g. "photos/*.jpg")
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Grid size N for an NxN grid
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_GRID_SIZE as i64))]
        size: Option<u32>,

        /// Output directory (default: next to each input, or [export] out)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write the text grid (.txt) instead of a PNG
        #[arg(long)]
        text: bool,

        /// Scale PNG output by integer factor
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: Option<u32>,

        /// Built-in palette to quantize against
        #[arg(long)]
        palette: Option<String>,

        /// Separate text cells with this character
        #[arg(long)]
        delimiter: Option<String>,

        /// Pixels with alpha below this become empty cells
        #[arg(long)]
        alpha_threshold: Option<u8>,
    },

    /// Render a text grid to PNG
    Render {
        /// Text grid file
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Scale output by integer factor
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: Option<u32>,

        /// Render the gridded editing preview instead of one pixel per cell
        #[arg(long)]
        preview: bool,

        /// Pixels per cell in preview mode
        #[arg(long, default_value = "16", value_parser = clap::value_parser!(u32).range(1..=128))]
        cell_px: u32,

        /// Palette the grid was written with
        #[arg(long)]
        palette: Option<String>,

        /// Cell separator the grid was written with
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// Show fill statistics and per-color counts of a text grid
    Stats {
        /// Text grid file
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Palette the grid was written with
        #[arg(long)]
        palette: Option<String>,

        /// Cell separator the grid was written with
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// List and inspect built-in palettes
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,
    },
}

/// Initialize logging; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            inputs,
            size,
            out,
            text,
            scale,
            palette,
            delimiter,
            alpha_threshold,
        } => {
            let overrides = CliOverrides {
                palette,
                grid_size: size.map(|s| s as usize),
                out,
                text_delimiter: delimiter,
                scale,
                alpha_threshold,
            };
            match load_settings(cli.config.as_deref(), &overrides) {
                Ok(settings) => convert::run_convert(&inputs, &settings, text),
                Err(code) => code,
            }
        }
        Commands::Render { input, output, scale, preview, cell_px, palette, delimiter } => {
            let overrides =
                CliOverrides { palette, text_delimiter: delimiter, scale, ..Default::default() };
            match load_settings(cli.config.as_deref(), &overrides) {
                Ok(settings) => render::run_render(&input, &output, &settings, preview, cell_px),
                Err(code) => code,
            }
        }
        Commands::Stats { input, json, palette, delimiter } => {
            let overrides = CliOverrides { palette, text_delimiter: delimiter, ..Default::default() };
            match load_settings(cli.config.as_deref(), &overrides) {
                Ok(settings) => stats::run_stats(&input, &settings, json),
                Err(code) => code,
            }
        }
        Commands::Palettes { action } => info::run_palettes(action),
    }
}

/// Resolved configuration shared by the subcommands.
pub(crate) struct Settings {
    pub config: PlacerConfig,
    pub palette: Arc<Palette>,
    pub format: TextFormat,
    /// Output directory given explicitly by flag or config file
    pub out: Option<PathBuf>,
}

/// Load `placer.toml`, apply flag overrides, and resolve the palette.
///
/// Errors are reported here; the caller only forwards the exit code.
fn load_settings(path: Option<&Path>, overrides: &CliOverrides) -> Result<Settings, ExitCode> {
    let config_path = path.map(Path::to_path_buf).or_else(config::find_config);
    let mut config = match config::load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    config::merge_cli_overrides(&mut config, overrides);
    if let Err(e) = config::check(&config) {
        eprintln!("Error: {}", e);
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    let palette = match palettes::get_builtin(&config.editor.palette) {
        Some(p) => Arc::new(p),
        None => {
            eprintln!("Error: Unknown palette '{}'", config.editor.palette);
            eprintln!();
            eprintln!("Available palettes:");
            for name in palettes::list_builtins() {
                eprintln!("  {}", name);
            }
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    let format = match config.export.text_format() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    // Config's default "." is not an explicit choice; keep outputs next to inputs then
    let out = overrides
        .out
        .clone()
        .or_else(|| config_path.is_some().then(|| config.export.out.clone()));

    Ok(Settings { config, palette, format, out })
}

/// Read and decode a text grid file, reporting failures on stderr.
pub(crate) fn read_grid(input: &Path, settings: &Settings) -> Result<crate::engine::GridEngine, ExitCode> {
    let text = match std::fs::read_to_string(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", input.display(), e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    match decode_text(&text, &settings.palette, settings.format) {
        Ok(grid) => Ok(crate::engine::GridEngine::with_grid(Arc::clone(&settings.palette), grid)),
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}
