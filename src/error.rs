//! Error types for grid editing and conversion

use thiserror::Error;

/// Failure of a single grid or session operation.
///
/// None of these are fatal to the session: the grid is left exactly as it was
/// before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GridError {
    /// Coordinate outside the grid extent
    #[error("cell ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },
    /// Code not present in the palette
    #[error("unknown color code '{0}'")]
    UnknownColorCode(String),
    /// Palette name with no built-in catalog
    #[error("unknown palette '{0}'")]
    UnknownPalette(String),
    /// Conversion requested before any reference image was loaded
    #[error("no reference image loaded, upload an image first")]
    NoReferenceImage,
    /// Grid size of zero or above the supported maximum
    #[error("grid size must be between 1 and {max}, got {size}")]
    InvalidSize { size: usize, max: usize },
    /// Raw RGBA buffer whose length doesn't match its dimensions
    #[error("pixel buffer has {actual} bytes, expected {expected} for a {width}x{height} RGBA image")]
    InvalidPixelBuffer { width: u32, height: u32, expected: usize, actual: usize },
    /// Image bytes the decoder could not read
    #[error("failed to decode image: {0}")]
    Decode(String),
    /// Preview canvas side above the supported maximum
    #[error("preview of a {size}x{size} grid at {cell_px}px per cell exceeds {max}px")]
    PreviewTooLarge { size: usize, cell_px: u32, max: u32 },
    /// Malformed text grid
    #[error("line {line}: {message}")]
    TextParse { line: usize, message: String },
}

impl From<image::ImageError> for GridError {
    fn from(e: image::ImageError) -> Self {
        GridError::Decode(e.to_string())
    }
}
