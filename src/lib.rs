//! Pixel Placer - palette-constrained pixel art grids
//!
//! This library provides functionality to:
//! - Paint an NxN grid with codes from a fixed color catalog
//! - Quantize a reference image into the grid by nearest palette color
//! - Export grids as plain text or true-resolution PNG, and read text back
//! - Report fill statistics and per-color usage

pub mod cli;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod grid;
pub mod output;
pub mod palette;
pub mod palettes;
pub mod quantize;
pub mod reference;
pub mod session;
pub mod stats;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use engine::GridEngine;
pub use error::GridError;
pub use export::TextFormat;
pub use palette::{Palette, PaletteEntry, PaletteIndex, Swatch};
pub use session::Session;
pub use stats::{ColorCounts, Stats};
