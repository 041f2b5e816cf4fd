//! Square cell matrix backing the editor.
//!
//! A [`Grid`] stores one optional palette index per cell, row-major. It knows
//! nothing about colors; the engine pairs it with a palette.

use crate::error::GridError;
use crate::palette::PaletteIndex;

/// Largest supported side length.
pub const MAX_GRID_SIZE: usize = 1024;

/// An N×N matrix of optional palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<PaletteIndex>>,
}

impl Grid {
    /// A grid of `size × size` empty cells.
    pub fn new(size: usize) -> Result<Self, GridError> {
        check_size(size)?;
        Ok(Self { size, cells: vec![None; size * size] })
    }

    /// Build from row-major cells; callers supply exactly `size * size`.
    pub(crate) fn from_cells(size: usize, cells: Vec<Option<PaletteIndex>>) -> Result<Self, GridError> {
        check_size(size)?;
        debug_assert_eq!(cells.len(), size * size);
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Option<PaletteIndex>, GridError> {
        let i = self.offset(x, y)?;
        Ok(self.cells[i])
    }

    pub fn set(&mut self, x: usize, y: usize, value: Option<PaletteIndex>) -> Result<(), GridError> {
        let i = self.offset(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Option<PaletteIndex>] {
        &self.cells
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, Option<PaletteIndex>> {
        self.cells.chunks(self.size)
    }

    /// Overwrite every cell at once; lengths must match.
    pub(crate) fn replace_cells(&mut self, cells: Vec<Option<PaletteIndex>>) {
        debug_assert_eq!(cells.len(), self.cells.len());
        self.cells = cells;
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds { x, y, size: self.size });
        }
        Ok(y * self.size + x)
    }
}

fn check_size(size: usize) -> Result<(), GridError> {
    if size == 0 || size > MAX_GRID_SIZE {
        return Err(GridError::InvalidSize { size, max: MAX_GRID_SIZE });
    }
    Ok(())
}
