//! Palettes command implementation

use clap::Subcommand;
use std::process::ExitCode;

use crate::palettes;

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand)]
pub enum PaletteAction {
    /// List all available built-in palettes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the entries of a specific palette
    Show {
        /// Name of the palette to show
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the palettes command
pub fn run_palettes(action: PaletteAction) -> ExitCode {
    match action {
        PaletteAction::List { json } => {
            let names = palettes::list_builtins();
            if json {
                match serde_json::to_string(&names) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                println!("Built-in palettes:");
                for name in names {
                    let marker = if name == palettes::DEFAULT_PALETTE { " (default)" } else { "" };
                    println!("  {}{}", name, marker);
                }
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        PaletteAction::Show { name, json } => match palettes::get_builtin(&name) {
            Some(palette) => {
                if json {
                    match serde_json::to_string_pretty(palette.entries()) {
                        Ok(s) => println!("{}", s),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            return ExitCode::from(EXIT_ERROR);
                        }
                    }
                } else {
                    println!("Palette: {}", palette.name());
                    println!();
                    for entry in palette.entries() {
                        println!("  {:<4} {:<12} {}", entry.code, entry.swatch.to_css(), entry.name);
                    }
                }
                ExitCode::from(EXIT_SUCCESS)
            }
            None => {
                eprintln!("Error: Unknown palette '{}'", name);
                eprintln!();
                eprintln!("Available palettes:");
                for builtin_name in palettes::list_builtins() {
                    eprintln!("  {}", builtin_name);
                }
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}
