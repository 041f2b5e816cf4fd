//! Fill statistics and per-color usage counts.

use serde::Serialize;

use crate::grid::Grid;
use crate::palette::Palette;

/// Filled vs. empty cell tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub filled_count: usize,
    pub empty_count: usize,
    /// `round(100 * filled / total)`
    pub fill_percent: u8,
}

impl Stats {
    pub fn of(grid: &Grid) -> Self {
        let total = grid.size() * grid.size();
        let filled_count = grid.filled_count();
        // Integer form of round-half-up on filled / total * 100
        let fill_percent = ((filled_count * 200 + total) / (total * 2)) as u8;
        Self { filled_count, empty_count: total - filled_count, fill_percent }
    }
}

/// Usage of one palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorCount {
    pub code: String,
    pub name: String,
    pub count: usize,
}

/// Per-entry usage in catalog order, plus the empty-cell tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorCounts {
    pub colors: Vec<ColorCount>,
    pub empty: usize,
}

impl ColorCounts {
    pub fn of(grid: &Grid, palette: &Palette) -> Self {
        let mut tally = vec![0usize; palette.len()];
        let mut empty = 0;
        for cell in grid.cells() {
            match cell {
                Some(index) => tally[*index as usize] += 1,
                None => empty += 1,
            }
        }

        let colors = palette
            .opaque()
            .map(|(index, entry, _)| ColorCount {
                code: entry.code.clone(),
                name: entry.name.clone(),
                count: tally[index as usize],
            })
            .collect();

        Self { colors, empty }
    }

    /// Count for a single code; zero for unknown codes.
    pub fn get(&self, code: &str) -> usize {
        self.colors.iter().find(|c| c.code == code).map(|c| c.count).unwrap_or(0)
    }

    /// Entries with at least one cell.
    pub fn used(&self) -> impl Iterator<Item = &ColorCount> {
        self.colors.iter().filter(|c| c.count > 0)
    }
}
