//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::output::{save_png, scale_image};
use crate::view::{render_preview, ViewState};

use super::{read_grid, Settings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(
    input: &Path,
    output: &Path,
    settings: &Settings,
    preview: bool,
    cell_px: u32,
) -> ExitCode {
    let engine = match read_grid(input, settings) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let image = if preview {
        match render_preview(&engine, None, &ViewState::default(), cell_px) {
            Ok(image) => image,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    } else {
        scale_image(engine.to_image(), settings.config.export.scale)
    };

    if let Err(e) = save_png(&image, output) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {} ({}x{})", output.display(), image.width(), image.height());
    ExitCode::from(EXIT_SUCCESS)
}
