//! Presentation state and the on-screen preview raster.
//!
//! Nothing here touches grid contents. [`ViewState`] holds the transient
//! interaction state a painting UI needs (zoom, drag, grid lines, underlay
//! opacity), [`CanvasGeometry`] maps pointer positions to cells, and
//! [`render_preview`] draws the zoomed, gridded picture shown while editing.

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

use crate::engine::GridEngine;
use crate::error::GridError;
use crate::reference::ReferenceImage;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 4.0;
pub const ZOOM_STEP: f32 = 0.1;

/// Smallest on-screen cell, in canvas pixels.
pub const MIN_CELL_PX: u32 = 8;
/// Widest canvas the layout allows.
pub const MAX_CANVAS_PX: u32 = 600;
/// Horizontal space reserved around the canvas.
pub const VIEWPORT_MARGIN: u32 = 80;
/// Largest preview canvas side, in pixels.
pub const MAX_PREVIEW_PX: u32 = 4096;

const GRID_LINE: Rgba<u8> = Rgba([200, 200, 200, 77]);
const CELL_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 26]);

/// Transient UI state kept apart from the grid engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    zoom: f32,
    show_grid: bool,
    reference_opacity: f32,
    dragging: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { zoom: 1.0, show_grid: true, reference_opacity: 0.3, dragging: false }
    }
}

impl ViewState {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    pub fn reset_zoom(&mut self) -> f32 {
        self.set_zoom(1.0)
    }

    /// Wheel scrolling: up zooms in, anything else zooms out.
    pub fn wheel(&mut self, delta_y: f64) -> f32 {
        if delta_y < 0.0 {
            self.zoom_in()
        } else {
            self.zoom_out()
        }
    }

    /// Zoom as a percentage label, e.g. `"120%"`.
    pub fn zoom_label(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round() as i32)
    }

    fn set_zoom(&mut self, zoom: f32) -> f32 {
        // Snap to tenths so repeated steps don't drift
        self.zoom = ((zoom * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    pub fn reference_opacity(&self) -> f32 {
        self.reference_opacity
    }

    /// Set the underlay opacity, clamped to `0.0..=1.0`.
    pub fn set_reference_opacity(&mut self, opacity: f32) {
        self.reference_opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a stroke; returns the cell to paint, if the press hit one.
    pub fn pointer_down(&mut self, cell: Option<(usize, usize)>) -> Option<(usize, usize)> {
        self.dragging = true;
        cell
    }

    /// Continue a stroke; cells are painted only while dragging.
    pub fn pointer_move(&mut self, cell: Option<(usize, usize)>) -> Option<(usize, usize)> {
        if self.dragging {
            cell
        } else {
            None
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn pointer_leave(&mut self) {
        self.dragging = false;
    }
}

/// Canvas pixels per cell for a viewport width.
pub fn cell_pixel_size(viewport_width: u32, grid_size: usize) -> u32 {
    let container = viewport_width.saturating_sub(VIEWPORT_MARGIN).min(MAX_CANVAS_PX);
    let per_cell = container / (grid_size.max(1) as u32);
    per_cell.max(MIN_CELL_PX)
}

/// Where the canvas sits on screen and how large it is internally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Canvas pixels per cell
    pub cell_px: u32,
    /// Internal canvas side length in pixels
    pub canvas_px: u32,
    /// Displayed bounding box: left, top, width, height
    pub display: (f64, f64, f64, f64),
}

impl CanvasGeometry {
    /// Geometry of an unscaled canvas at the origin.
    pub fn new(grid_size: usize, cell_px: u32) -> Self {
        let canvas_px = u32::try_from(grid_size).unwrap_or(u32::MAX).saturating_mul(cell_px);
        Self { cell_px, canvas_px, display: (0.0, 0.0, canvas_px as f64, canvas_px as f64) }
    }

    /// Same canvas displayed at another position and size (zoom, CSS layout).
    pub fn with_display(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.display = (left, top, width, height);
        self
    }

    /// Cell under a pointer at client coordinates, `None` outside the grid.
    pub fn pointer_to_cell(&self, client_x: f64, client_y: f64, grid_size: usize) -> Option<(usize, usize)> {
        let (left, top, width, height) = self.display;
        if !client_x.is_finite() || !client_y.is_finite() {
            return None;
        }
        if width <= 0.0 || height <= 0.0 || self.cell_px == 0 {
            return None;
        }
        let scale_x = self.canvas_px as f64 / width;
        let scale_y = self.canvas_px as f64 / height;
        let x = (((client_x - left) * scale_x) / self.cell_px as f64).floor();
        let y = (((client_y - top) * scale_y) / self.cell_px as f64).floor();
        let size = grid_size as f64;
        if x < 0.0 || y < 0.0 || x >= size || y >= size {
            return None;
        }
        Some((x as usize, y as usize))
    }
}

/// Tooltip text for a hovered cell: `"(3, 7) - R"` or `"(3, 7) - Empty"`.
pub fn hover_label(engine: &GridEngine, x: usize, y: usize) -> Option<String> {
    let cell = engine.get_cell(x, y).ok()?;
    Some(format!("({}, {}) - {}", x, y, cell.unwrap_or("Empty")))
}

/// Side length of the preview canvas, bounded by [`MAX_PREVIEW_PX`].
pub fn preview_side(grid_size: usize, cell_px: u32) -> Result<u32, GridError> {
    u32::try_from(grid_size)
        .ok()
        .and_then(|size| size.checked_mul(cell_px))
        .filter(|side| *side <= MAX_PREVIEW_PX)
        .ok_or(GridError::PreviewTooLarge { size: grid_size, cell_px, max: MAX_PREVIEW_PX })
}

/// Render the editing view: reference underlay, inset cells, grid lines.
pub fn render_preview(
    engine: &GridEngine,
    reference: Option<&ReferenceImage>,
    view: &ViewState,
    cell_px: u32,
) -> Result<RgbaImage, GridError> {
    let size = engine.size() as u32;
    let canvas_px = preview_side(engine.size(), cell_px)?;
    let mut canvas = RgbaImage::new(canvas_px, canvas_px);

    if let Some(reference) = reference {
        if view.reference_opacity > 0.0 {
            let underlay =
                imageops::resize(reference.image(), canvas_px, canvas_px, FilterType::Nearest);
            for (dst, src) in canvas.pixels_mut().zip(underlay.pixels()) {
                let alpha = (src[3] as f32 * view.reference_opacity).round() as u8;
                *dst = Rgba([src[0], src[1], src[2], alpha]);
            }
        }
    }

    // Cells are inset one pixel when there's room for it
    let inset = if cell_px >= 3 { 1 } else { 0 };
    let side = cell_px.saturating_sub(2 * inset);
    for (y, row) in engine.grid().rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let Some(rgb) = cell.and_then(|i| engine.palette().entry(i).swatch.rgb()) else {
                continue;
            };
            let left = x as u32 * cell_px + inset;
            let top = y as u32 * cell_px + inset;
            fill_rect(&mut canvas, left, top, side, side, Rgba([rgb[0], rgb[1], rgb[2], 255]));
            if cell_px > 10 {
                outline_rect(&mut canvas, left, top, side, side, CELL_OUTLINE);
            }
        }
    }

    if view.show_grid && canvas_px > 0 {
        for i in 0..=size {
            let offset = (i * cell_px).min(canvas_px - 1);
            for t in 0..canvas_px {
                canvas.get_pixel_mut(offset, t).blend(&GRID_LINE);
                canvas.get_pixel_mut(t, offset).blend(&GRID_LINE);
            }
        }
    }

    Ok(canvas)
}

fn fill_rect(canvas: &mut RgbaImage, left: u32, top: u32, width: u32, height: u32, color: Rgba<u8>) {
    for y in top..(top + height).min(canvas.height()) {
        for x in left..(left + width).min(canvas.width()) {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn outline_rect(canvas: &mut RgbaImage, left: u32, top: u32, width: u32, height: u32, color: Rgba<u8>) {
    if width == 0 || height == 0 {
        return;
    }
    let right = left + width - 1;
    let bottom = top + height - 1;
    for x in left..=right {
        canvas.get_pixel_mut(x, top).blend(&color);
        canvas.get_pixel_mut(x, bottom).blend(&color);
    }
    for y in (top + 1)..bottom {
        canvas.get_pixel_mut(left, y).blend(&color);
        canvas.get_pixel_mut(right, y).blend(&color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palettes::wplace;
    use std::sync::Arc;

    fn engine(size: usize) -> GridEngine {
        GridEngine::new(Arc::new(wplace()), size).unwrap()
    }

    #[test]
    fn test_zoom_bounds_and_steps() {
        let mut view = ViewState::default();
        assert_eq!(view.zoom_in(), 1.1);
        assert_eq!(view.zoom_label(), "110%");
        for _ in 0..100 {
            view.zoom_in();
        }
        assert_eq!(view.zoom(), MAX_ZOOM);
        for _ in 0..100 {
            view.zoom_out();
        }
        assert_eq!(view.zoom(), MIN_ZOOM);
        assert_eq!(view.zoom_label(), "50%");
        assert_eq!(view.reset_zoom(), 1.0);
    }

    #[test]
    fn test_wheel_direction() {
        let mut view = ViewState::default();
        assert_eq!(view.wheel(-3.0), 1.1);
        assert_eq!(view.wheel(3.0), 1.0);
        assert_eq!(view.wheel(0.0), 0.9);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut view = ViewState::default();
        view.set_reference_opacity(1.7);
        assert_eq!(view.reference_opacity(), 1.0);
        view.set_reference_opacity(-0.2);
        assert_eq!(view.reference_opacity(), 0.0);
    }

    #[test]
    fn test_drag_paints_only_while_pressed() {
        let mut view = ViewState::default();
        assert_eq!(view.pointer_move(Some((1, 1))), None);
        assert_eq!(view.pointer_down(Some((0, 0))), Some((0, 0)));
        assert_eq!(view.pointer_move(Some((1, 1))), Some((1, 1)));
        view.pointer_leave();
        assert_eq!(view.pointer_move(Some((2, 2))), None);
    }

    #[test]
    fn test_cell_pixel_size() {
        // 1280 wide viewport caps at 600px: 600 / 40 = 15
        assert_eq!(cell_pixel_size(1280, 40), 15);
        // phone width: (375 - 80) / 40 = 7 -> minimum 8
        assert_eq!(cell_pixel_size(375, 40), MIN_CELL_PX);
        assert_eq!(cell_pixel_size(0, 10), MIN_CELL_PX);
    }

    #[test]
    fn test_pointer_to_cell_unscaled() {
        let geometry = CanvasGeometry::new(10, 10);
        assert_eq!(geometry.pointer_to_cell(0.0, 0.0, 10), Some((0, 0)));
        assert_eq!(geometry.pointer_to_cell(99.9, 45.0, 10), Some((9, 4)));
        assert_eq!(geometry.pointer_to_cell(100.0, 5.0, 10), None);
        assert_eq!(geometry.pointer_to_cell(-0.5, 5.0, 10), None);
    }

    #[test]
    fn test_pointer_to_cell_zoomed_and_offset() {
        // 100px canvas shown at 200px, 50px from the left edge
        let geometry = CanvasGeometry::new(10, 10).with_display(50.0, 20.0, 200.0, 200.0);
        assert_eq!(geometry.pointer_to_cell(50.0, 20.0, 10), Some((0, 0)));
        assert_eq!(geometry.pointer_to_cell(70.0, 60.0, 10), Some((1, 2)));
        assert_eq!(geometry.pointer_to_cell(249.0, 219.0, 10), Some((9, 9)));
        assert_eq!(geometry.pointer_to_cell(40.0, 60.0, 10), None);
    }

    #[test]
    fn test_pointer_to_cell_non_finite() {
        let geometry = CanvasGeometry::new(10, 10);
        assert_eq!(geometry.pointer_to_cell(f64::NAN, f64::NAN, 10), None);
        assert_eq!(geometry.pointer_to_cell(5.0, f64::NAN, 10), None);
        assert_eq!(geometry.pointer_to_cell(f64::INFINITY, 5.0, 10), None);
    }

    #[test]
    fn test_huge_cell_size_geometry_saturates() {
        let geometry = CanvasGeometry::new(1024, 5_000_000);
        assert_eq!(geometry.canvas_px, u32::MAX);
    }

    #[test]
    fn test_hover_label() {
        let mut engine = engine(4);
        engine.set_cell(3, 1, Some("R")).unwrap();
        assert_eq!(hover_label(&engine, 3, 1).as_deref(), Some("(3, 1) - R"));
        assert_eq!(hover_label(&engine, 0, 0).as_deref(), Some("(0, 0) - Empty"));
        assert_eq!(hover_label(&engine, 9, 9), None);
    }

    #[test]
    fn test_render_preview_cells_inset() {
        let mut engine = engine(2);
        engine.set_cell(1, 0, Some("R")).unwrap();
        let mut view = ViewState::default();
        view.toggle_grid();

        let canvas = render_preview(&engine, None, &view, 8).unwrap();
        assert_eq!(canvas.dimensions(), (16, 16));
        // inside the red cell
        assert_eq!(*canvas.get_pixel(12, 4), Rgba([255, 0, 0, 255]));
        // one-pixel gutter around it stays clear
        assert_eq!(canvas.get_pixel(8, 4)[3], 0);
        // empty cell stays clear
        assert_eq!(canvas.get_pixel(4, 4)[3], 0);
    }

    #[test]
    fn test_render_preview_grid_lines() {
        let engine = engine(2);
        let canvas = render_preview(&engine, None, &ViewState::default(), 8).unwrap();
        assert!(canvas.get_pixel(8, 3)[3] > 0, "grid line between columns");
        assert_eq!(canvas.get_pixel(4, 4)[3], 0);
    }

    #[test]
    fn test_render_preview_reference_underlay() {
        let engine = engine(2);
        let reference =
            ReferenceImage::from_image(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]))).unwrap();
        let mut view = ViewState::default();
        view.toggle_grid();
        view.set_reference_opacity(0.5);

        let canvas = render_preview(&engine, Some(&reference), &view, 8).unwrap();
        assert_eq!(*canvas.get_pixel(4, 4), Rgba([0, 0, 255, 128]));

        view.set_reference_opacity(0.0);
        let canvas = render_preview(&engine, Some(&reference), &view, 8).unwrap();
        assert_eq!(canvas.get_pixel(4, 4)[3], 0);
    }

    #[test]
    fn test_render_preview_rejects_oversized_canvas() {
        let engine = engine(1024);
        let view = ViewState::default();
        assert_eq!(
            render_preview(&engine, None, &view, 5_000_000),
            Err(GridError::PreviewTooLarge { size: 1024, cell_px: 5_000_000, max: MAX_PREVIEW_PX })
        );
        assert!(render_preview(&engine, None, &view, 128).is_err());
        assert_eq!(preview_side(1024, 4), Ok(4096));
        assert_eq!(preview_side(40, 15), Ok(600));
    }
}
