//! Image to grid quantization.
//!
//! The source raster is sampled nearest-neighbor down (or up) to exactly
//! `size × size` texels. Each texel then becomes either an empty cell (alpha
//! below the threshold) or the nearest opaque palette entry by Euclidean
//! distance in RGB space.
//!
//! Ties go to whichever entry comes first in catalog order, so a conversion is
//! fully deterministic for a given palette.

use std::collections::HashMap;

use image::imageops::{self, FilterType};
use image::{Rgb, Rgba, RgbaImage};

use crate::palette::{Palette, PaletteIndex};

/// Texels with alpha below this (0-255 scale) become empty cells.
pub const ALPHA_THRESHOLD: u8 = 50;

/// Squared Euclidean distance between two RGB colors.
///
/// Squaring preserves the ordering of the true distance, including ties.
#[inline]
pub fn distance_sq(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Euclidean distance between two RGB colors.
pub fn distance(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    (distance_sq(a, b) as f64).sqrt()
}

/// Nearest opaque entry to `color`, first strict minimum in catalog order.
///
/// Returns `None` only for a palette with no opaque entries.
pub fn nearest_color(palette: &Palette, color: Rgb<u8>) -> Option<PaletteIndex> {
    let mut best: Option<(PaletteIndex, u32)> = None;
    for (index, _, rgb) in palette.opaque() {
        let d = distance_sq(color, rgb);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((index, d)),
        }
        if d == 0 {
            break;
        }
    }
    best.map(|(index, _)| index)
}

/// Sample `image` to `size × size` with nearest-neighbor filtering.
pub fn sample_nearest(image: &RgbaImage, size: u32) -> RgbaImage {
    if image.width() == size && image.height() == size {
        return image.clone();
    }
    imageops::resize(image, size, size, FilterType::Nearest)
}

/// Palette matcher with a per-color memo.
///
/// Photos repeat colors heavily, so remembering each answer avoids most of
/// the palette scans without changing any result.
#[derive(Debug)]
pub struct Quantizer<'a> {
    palette: &'a Palette,
    alpha_threshold: u8,
    cache: HashMap<[u8; 3], Option<PaletteIndex>>,
    hits: usize,
}

impl<'a> Quantizer<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self::with_alpha_threshold(palette, ALPHA_THRESHOLD)
    }

    pub fn with_alpha_threshold(palette: &'a Palette, alpha_threshold: u8) -> Self {
        Self { palette, alpha_threshold, cache: HashMap::new(), hits: 0 }
    }

    /// Cell value for a single texel.
    pub fn quantize_pixel(&mut self, pixel: Rgba<u8>) -> Option<PaletteIndex> {
        let [r, g, b, a] = pixel.0;
        if a < self.alpha_threshold {
            return None;
        }
        if let Some(cached) = self.cache.get(&[r, g, b]) {
            self.hits += 1;
            return *cached;
        }
        let nearest = nearest_color(self.palette, Rgb([r, g, b]));
        self.cache.insert([r, g, b], nearest);
        nearest
    }

    /// Row-major cell values for `image` sampled to `size × size`.
    pub fn quantize_image(&mut self, image: &RgbaImage, size: usize) -> Vec<Option<PaletteIndex>> {
        let sampled = sample_nearest(image, size as u32);
        let cells: Vec<Option<PaletteIndex>> =
            sampled.pixels().map(|pixel| self.quantize_pixel(*pixel)).collect();
        log::debug!(
            "quantized {}x{} source into {}x{} grid ({} distinct colors, {} cache hits)",
            image.width(),
            image.height(),
            size,
            size,
            self.cache.len(),
            self.hits
        );
        cells
    }
}

/// Quantize `image` into row-major cells with the default alpha threshold.
pub fn quantize_image(palette: &Palette, image: &RgbaImage, size: usize) -> Vec<Option<PaletteIndex>> {
    Quantizer::new(palette).quantize_image(image, size)
}
