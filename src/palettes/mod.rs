//! Built-in palette definitions.
//!
//! Catalogs are fixed at compile time; each one ends with the `E` eraser.
//! `wplace` is the default catalog used by the editor.

use crate::palette::{Palette, PaletteError};

/// Name of the catalog used when nothing else is configured.
pub const DEFAULT_PALETTE: &str = "wplace";

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["wplace", "pico8", "grayscale", "1bit"];

const WPLACE: &[(&str, &str, &str)] = &[
    ("K", "#000000", "Black"),
    ("G1", "#4a4a4a", "Dark Gray"),
    ("G2", "#808080", "Gray"),
    ("G3", "#c0c0c0", "Light Gray"),
    ("W", "#ffffff", "White"),
    ("DR", "#800000", "Dark Red"),
    ("R", "#ff0000", "Red"),
    ("O", "#ff8000", "Orange"),
    ("Y1", "#ffa500", "Orange Yellow"),
    ("Y", "#ffff00", "Yellow"),
    ("LY", "#ffffe0", "Light Yellow"),
    ("DG", "#008000", "Dark Green"),
    ("G", "#00ff00", "Green"),
    ("LG", "#90ee90", "Light Green"),
    ("T1", "#008080", "Teal"),
    ("T2", "#40e0d0", "Turquoise"),
    ("C", "#00ffff", "Cyan"),
    ("DB", "#000080", "Dark Blue"),
    ("B", "#0080ff", "Blue"),
    ("LB", "#add8e6", "Light Blue"),
    ("P1", "#8000ff", "Purple"),
    ("P2", "#c080ff", "Light Purple"),
    ("M1", "#ff00ff", "Magenta"),
    ("M2", "#ff80ff", "Light Magenta"),
    ("PI1", "#dda0dd", "Plum"),
    ("PI2", "#ff1493", "Deep Pink"),
    ("PI3", "#ff69b4", "Hot Pink"),
    ("PI4", "#ffb6c1", "Light Pink"),
    ("BR1", "#8b4513", "Saddle Brown"),
    ("BR2", "#d2691e", "Chocolate"),
    ("BR3", "#deb887", "Burlywood"),
    ("E", "transparent", "Eraser"),
];

/// PICO-8 16-color palette.
/// Reference: https://lospec.com/palette-list/pico-8
const PICO8: &[(&str, &str, &str)] = &[
    ("K", "#000000", "Black"),
    ("DB", "#1D2B53", "Dark Blue"),
    ("DP", "#7E2553", "Dark Purple"),
    ("DG", "#008751", "Dark Green"),
    ("BR", "#AB5236", "Brown"),
    ("G1", "#5F574F", "Dark Gray"),
    ("G3", "#C2C3C7", "Light Gray"),
    ("W", "#FFF1E8", "White"),
    ("R", "#FF004D", "Red"),
    ("O", "#FFA300", "Orange"),
    ("Y", "#FFEC27", "Yellow"),
    ("G", "#00E436", "Green"),
    ("B", "#29ADFF", "Blue"),
    ("I", "#83769C", "Indigo"),
    ("PI", "#FF77A8", "Pink"),
    ("PE", "#FFCCAA", "Peach"),
    ("E", "transparent", "Eraser"),
];

/// 8-shade grayscale palette from white to black.
const GRAYSCALE: &[(&str, &str, &str)] = &[
    ("W", "#FFFFFF", "White"),
    ("1", "#DFDFDF", "Gray 1"),
    ("2", "#BFBFBF", "Gray 2"),
    ("3", "#9F9F9F", "Gray 3"),
    ("4", "#7F7F7F", "Gray 4"),
    ("5", "#5F5F5F", "Gray 5"),
    ("6", "#3F3F3F", "Gray 6"),
    ("K", "#000000", "Black"),
    ("E", "transparent", "Eraser"),
];

/// 1-bit black and white palette.
const ONE_BIT: &[(&str, &str, &str)] =
    &[("K", "#000000", "Black"), ("W", "#FFFFFF", "White"), ("E", "transparent", "Eraser")];

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<Palette> {
    let table = match name {
        "wplace" => WPLACE,
        "pico8" => PICO8,
        "grayscale" => GRAYSCALE,
        "1bit" => ONE_BIT,
        _ => return None,
    };
    // The tables above are fixed; a failure here is caught by the tests below.
    build(name, table).ok()
}

/// The default wplace catalog.
pub fn wplace() -> Palette {
    match build("wplace", WPLACE) {
        Ok(palette) => palette,
        Err(e) => unreachable!("built-in wplace palette is invalid: {}", e),
    }
}

fn build(name: &str, table: &[(&str, &str, &str)]) -> Result<Palette, PaletteError> {
    Palette::from_table(name, table)
}
