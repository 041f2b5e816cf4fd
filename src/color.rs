//! Color literal parsing for palette catalogs
//!
//! Supports the following formats:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - The keyword `transparent`

use image::{Rgb, Rgba};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#' and isn't a known keyword
    #[error("color must start with '#' or be 'transparent'")]
    MissingHash,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Fully transparent black, the value every empty cell exports as.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Parse a color literal into an RGBA color.
///
/// # Examples
///
/// ```
/// use pixel_placer::color::parse_color;
///
/// let red = parse_color("#F00").unwrap();
/// assert_eq!(red, image::Rgba([255, 0, 0, 255]));
///
/// let teal = parse_color("#008080").unwrap();
/// assert_eq!(teal, image::Rgba([0, 128, 128, 255]));
///
/// let clear = parse_color("transparent").unwrap();
/// assert_eq!(clear, image::Rgba([0, 0, 0, 0]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if s.eq_ignore_ascii_case("transparent") {
        return Ok(TRANSPARENT);
    }

    if !s.starts_with('#') {
        return Err(ColorError::MissingHash);
    }

    parse_hex_color(s)
}

/// Format an opaque color as `#rrggbb`.
pub fn to_hex(color: Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Parse a hex color string (#RGB, #RGBA, #RRGGBB, #RRGGBBAA)
fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let digits: Vec<u8> = s[1..].chars().map(parse_hex_digit).collect::<Result<_, _>>()?;

    match digits.len() {
        // Short forms double each digit: #F00 -> #FF0000
        3 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, 255])),
        4 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, digits[3] * 17])),
        6 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            255,
        ])),
        8 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            digits[6] * 16 + digits[7],
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}
