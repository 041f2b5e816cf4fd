//! Grid serialization: the plain-text layout and the true-resolution raster.
//!
//! # Text layout
//!
//! One line per row, `\n` between rows and none after the last. In the
//! default [`TextFormat::Concatenated`] layout each filled cell writes its
//! code and each empty cell a single space, so a 3×3 grid (empty cells shown
//! as `·`) reads like:
//!
//! ```text
//! K·R
//! ··B
//! W··
//! ```
//!
//! A single trailing newline is tolerated when reading.
//!
//! With multi-character codes (`G1`, `PI3`, ...) concatenation no longer has
//! one character per cell. [`TextFormat::Delimited`] writes the same cells
//! separated by a chosen character, with empty cells as empty tokens.
//!
//! # Raster
//!
//! Exactly one pixel per cell: the entry's color at full opacity, or
//! `(0, 0, 0, 0)` for an empty cell.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgba, RgbaImage};

use crate::color::TRANSPARENT;
use crate::error::GridError;
use crate::grid::Grid;
use crate::palette::{Palette, PaletteIndex};

/// How cells are laid out within a text row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    /// Codes back to back, a space for each empty cell.
    #[default]
    Concatenated,
    /// Codes separated by the given character, empty cells as empty tokens.
    Delimited(char),
}

impl TextFormat {
    /// `None` or an empty string selects the concatenated layout.
    pub fn from_delimiter(delimiter: Option<&str>) -> Result<Self, String> {
        match delimiter {
            None | Some("") => Ok(TextFormat::Concatenated),
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(TextFormat::Delimited(c)),
                    _ => Err(format!("delimiter must be a single character, got '{}'", s)),
                }
            }
        }
    }
}

/// Serialize `grid` to the text layout.
pub fn encode_text(grid: &Grid, palette: &Palette, format: TextFormat) -> String {
    let mut output = String::with_capacity(grid.size() * (grid.size() + 1));
    for (y, row) in grid.rows().enumerate() {
        if y > 0 {
            output.push('\n');
        }
        for (x, cell) in row.iter().enumerate() {
            match format {
                TextFormat::Concatenated => match cell {
                    Some(index) => output.push_str(&palette.entry(*index).code),
                    None => output.push(' '),
                },
                TextFormat::Delimited(delimiter) => {
                    if x > 0 {
                        output.push(delimiter);
                    }
                    if let Some(index) = cell {
                        output.push_str(&palette.entry(*index).code);
                    }
                }
            }
        }
    }
    output
}

/// Parse the text layout back into a grid.
///
/// The number of lines sets the grid size and every row must hold exactly
/// that many cells. Concatenated rows are split by greedy longest-code
/// match. The eraser code reads as an empty cell.
pub fn decode_text(text: &str, palette: &Palette, format: TextFormat) -> Result<Grid, GridError> {
    let text = text.strip_suffix('\n').map(|t| t.strip_suffix('\r').unwrap_or(t)).unwrap_or(text);
    let lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    let size = lines.len();

    // Longest codes first so "PI1" wins over a hypothetical "P"
    let mut codes: Vec<(&str, PaletteIndex)> = palette
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| (e.code.as_str(), i as PaletteIndex))
        .collect();
    codes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let eraser = palette.eraser_index();
    let mut cells = Vec::with_capacity(size * size);
    for (row_idx, line) in lines.iter().enumerate() {
        let line_no = row_idx + 1;
        let row = match format {
            TextFormat::Concatenated => tokenize_concatenated(line, &codes)
                .map_err(|message| GridError::TextParse { line: line_no, message })?,
            TextFormat::Delimited(delimiter) => line
                .split(delimiter)
                .map(|token| match token.trim() {
                    "" => Ok(None),
                    code => palette.index_of(code).map(Some).map_err(|_| GridError::TextParse {
                        line: line_no,
                        message: format!("unknown color code '{}'", code),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        if row.len() != size {
            return Err(GridError::TextParse {
                line: line_no,
                message: format!(
                    "row has {} cells, expected {} (rows must match the line count)",
                    row.len(),
                    size
                ),
            });
        }
        cells.extend(row.into_iter().map(|cell| cell.filter(|i| *i != eraser)));
    }

    Grid::from_cells(size, cells)
}

fn tokenize_concatenated(
    line: &str,
    codes: &[(&str, PaletteIndex)],
) -> Result<Vec<Option<PaletteIndex>>, String> {
    let mut row = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix(' ') {
            row.push(None);
            rest = tail;
            continue;
        }
        match codes.iter().find(|(code, _)| rest.starts_with(code)) {
            Some((code, index)) => {
                row.push(Some(*index));
                rest = &rest[code.len()..];
            }
            None => {
                let column = line.len() - rest.len() + 1;
                return Err(format!("no color code matches at column {}", column));
            }
        }
    }
    Ok(row)
}

/// Render `grid` at one pixel per cell.
pub fn to_image(grid: &Grid, palette: &Palette) -> RgbaImage {
    let size = grid.size() as u32;
    let cells = grid.cells();
    RgbaImage::from_fn(size, size, |x, y| {
        let cell = cells[(y * size + x) as usize];
        cell.and_then(|index| palette.entry(index).swatch.rgb())
            .map(|rgb| Rgba([rgb[0], rgb[1], rgb[2], 255]))
            .unwrap_or(TRANSPARENT)
    })
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut png_data = Vec::new();
    let encoder = PngEncoder::new(&mut png_data);
    encoder.write_image(image.as_raw(), image.width(), image.height(), image::ColorType::Rgba8)?;
    Ok(png_data)
}

/// `data:image/png;base64,...` URL for an RGBA image.
pub fn png_data_url(image: &RgbaImage) -> Result<String, image::ImageError> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Download name for a text export: `pixelart_40x40_1700000000000.txt`
pub fn text_file_name(size: usize, timestamp_ms: u128) -> String {
    format!("pixelart_{}x{}_{}.txt", size, size, timestamp_ms)
}

/// Download name for a PNG export: `pixel-art-40x40-1700000000000.png`
pub fn png_file_name(size: usize, timestamp_ms: u128) -> String {
    format!("pixel-art-{}x{}-{}.png", size, size, timestamp_ms)
}
