//! Pixel Placer - command-line tool for converting images into palette grids

use std::process::ExitCode;

use pixel_placer::cli;

fn main() -> ExitCode {
    cli::run()
}
