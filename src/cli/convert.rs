//! Convert command implementation

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::output::{converted_path, save_png, save_text, scale_image};
use crate::reference::ReferenceImage;
use crate::session::Session;
use crate::stats::Stats;

use super::{expand_inputs, Settings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Outcome of converting a single input.
struct Converted {
    output: PathBuf,
    stats: Stats,
}

/// Execute the convert command
pub fn run_convert(inputs: &[String], settings: &Settings, text: bool) -> ExitCode {
    let files = expand_inputs(inputs);
    if files.is_empty() {
        eprintln!("Error: No input images");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    log::debug!("converting {} file(s) on {} threads", files.len(), rayon::current_num_threads());

    // Each input gets its own session; nothing is shared but the palette
    let results: Vec<(&PathBuf, Result<Converted, String>)> =
        files.par_iter().map(|input| (input, convert_one(input, settings, text))).collect();

    let size = settings.config.editor.grid_size;
    let mut failed = 0;
    for (input, result) in results {
        match result {
            Ok(done) => println!(
                "Converted: {} -> {} ({}x{}, {}% filled)",
                input.display(),
                done.output.display(),
                size,
                size,
                done.stats.fill_percent
            ),
            Err(message) => {
                eprintln!("Error: {}: {}", input.display(), message);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

fn convert_one(input: &Path, settings: &Settings, text: bool) -> Result<Converted, String> {
    let config = &settings.config;
    let reference = ReferenceImage::open(input).map_err(|e| e.to_string())?;

    let mut session =
        Session::new(Arc::clone(&settings.palette), config.editor.grid_size).map_err(|e| e.to_string())?;
    session.set_alpha_threshold(config.quantize.alpha_threshold);
    session.load_reference(reference);
    let stats = session.convert_now().map_err(|e| e.to_string())?;

    let extension = if text { "txt" } else { "png" };
    let output = converted_path(input, settings.out.as_deref(), extension);
    if text {
        save_text(&session.export_text(settings.format), &output).map_err(|e| e.to_string())?;
    } else {
        let image = scale_image(session.engine().to_image(), config.export.scale);
        save_png(&image, &output).map_err(|e| e.to_string())?;
    }
    log::info!("wrote {}", output.display());

    Ok(Converted { output, stats })
}
