//! Stats command implementation

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::stats::{ColorCounts, Stats};

use super::{read_grid, Settings, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Serialize)]
struct StatsReport<'a> {
    palette: &'a str,
    grid_size: usize,
    #[serde(flatten)]
    stats: Stats,
    colors: ColorCounts,
}

/// Execute the stats command
pub fn run_stats(input: &Path, settings: &Settings, json: bool) -> ExitCode {
    let engine = match read_grid(input, settings) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let report = StatsReport {
        palette: engine.palette().name(),
        grid_size: engine.size(),
        stats: engine.compute_stats(),
        colors: engine.color_counts(),
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("{}: {}x{} ({})", input.display(), report.grid_size, report.grid_size, report.palette);
    println!("  Filled: {}", report.stats.filled_count);
    println!("  Empty:  {}", report.stats.empty_count);
    println!("  Fill:   {}%", report.stats.fill_percent);
    let used: Vec<_> = report.colors.used().collect();
    if !used.is_empty() {
        println!();
        println!("Colors:");
        for color in used {
            println!("  {:<4} {:<16} {}", color.code, color.name, color.count);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}
