//! The grid engine: sole owner of the cell matrix.
//!
//! Collaborators address cells by coordinate and color code only; they never
//! see the underlying storage. Every mutation is all-or-nothing, and a failed
//! call leaves the grid exactly as it was.

use std::cell::Cell;
use std::sync::Arc;

use image::RgbaImage;

use crate::error::GridError;
use crate::export::{self, TextFormat};
use crate::grid::Grid;
use crate::palette::{Palette, PaletteEntry, PaletteIndex};
use crate::quantize::Quantizer;
use crate::stats::{ColorCounts, Stats};

/// Palette-constrained N×N pixel grid.
#[derive(Debug, Clone)]
pub struct GridEngine {
    palette: Arc<Palette>,
    grid: Grid,
    stats: Cell<Option<Stats>>,
}

impl GridEngine {
    pub fn new(palette: Arc<Palette>, size: usize) -> Result<Self, GridError> {
        Ok(Self { palette, grid: Grid::new(size)?, stats: Cell::new(None) })
    }

    /// Wrap an existing grid, e.g. one decoded from text.
    pub fn with_grid(palette: Arc<Palette>, grid: Grid) -> Self {
        Self { palette, grid, stats: Cell::new(None) }
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Replace the grid with an empty `size × size` one.
    pub fn resize(&mut self, size: usize) -> Result<(), GridError> {
        self.grid = Grid::new(size)?;
        self.stats.set(None);
        log::info!("grid resized to {}x{}", size, size);
        Ok(())
    }

    /// Empty every cell, keeping the size.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.stats.set(None);
    }

    /// Write `code` (or empty) into a cell. The eraser code empties the cell.
    ///
    /// Coordinates are checked before the code, so an off-grid write always
    /// fails with [`GridError::OutOfBounds`].
    pub fn set_cell(&mut self, x: usize, y: usize, code: Option<&str>) -> Result<(), GridError> {
        if !self.grid.contains(x, y) {
            return Err(GridError::OutOfBounds { x, y, size: self.grid.size() });
        }
        let value = match code {
            Some(code) => self.resolve(code)?,
            None => None,
        };
        self.grid.set(x, y, value)?;
        self.stats.set(None);
        Ok(())
    }

    /// Code stored at a cell, `None` when empty.
    pub fn get_cell(&self, x: usize, y: usize) -> Result<Option<&str>, GridError> {
        Ok(self.get_entry(x, y)?.map(|entry| entry.code.as_str()))
    }

    /// Palette entry stored at a cell, `None` when empty.
    pub fn get_entry(&self, x: usize, y: usize) -> Result<Option<&PaletteEntry>, GridError> {
        Ok(self.grid.get(x, y)?.map(|index| self.palette.entry(index)))
    }

    /// Overwrite every cell from `image`, sampled to the grid size.
    pub fn quantize_from(&mut self, image: &RgbaImage, alpha_threshold: u8) {
        if self.palette.opaque().next().is_none() {
            log::warn!("palette '{}' has no opaque colors, every cell will be empty", self.palette.name());
        }
        let cells = Quantizer::with_alpha_threshold(&self.palette, alpha_threshold)
            .quantize_image(image, self.grid.size());
        self.grid.replace_cells(cells);
        self.stats.set(None);
    }

    /// Fill statistics, recomputed only after a mutation.
    pub fn compute_stats(&self) -> Stats {
        if let Some(stats) = self.stats.get() {
            return stats;
        }
        let stats = Stats::of(&self.grid);
        self.stats.set(Some(stats));
        stats
    }

    pub fn color_counts(&self) -> ColorCounts {
        ColorCounts::of(&self.grid, &self.palette)
    }

    pub fn to_text(&self, format: TextFormat) -> String {
        export::encode_text(&self.grid, &self.palette, format)
    }

    /// True-resolution raster, one pixel per cell.
    pub fn to_image(&self) -> RgbaImage {
        export::to_image(&self.grid, &self.palette)
    }

    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        export::encode_png(&self.to_image())
    }

    fn resolve(&self, code: &str) -> Result<Option<PaletteIndex>, GridError> {
        let index = self.palette.index_of(code)?;
        Ok((index != self.palette.eraser_index()).then_some(index))
    }
}
