//! Writing exports to disk and choosing their file names

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image as PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Save a text grid, creating parent directories as needed.
pub fn save_text(text: &str, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Keeps one grid cell as a crisp `factor`x`factor` block. A factor of 0 or
/// 1 returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Milliseconds since the Unix epoch, used to stamp export file names.
pub fn timestamp_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0)
}

/// Output path for a converted input file.
///
/// `photos/cat.jpg` with `out = dist` and extension `txt` becomes
/// `dist/cat.txt`. Without an output directory the file lands next to its input.
pub fn converted_path(input: &Path, out: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let file_name = format!("{}.{}", stem, extension);
    match out {
        Some(dir) => dir.join(file_name),
        None => match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
            _ => PathBuf::from(file_name),
        },
    }
}
