//! WASM API module for browser/JS interop
//!
//! Exposes an editing session to a browser UI. The page owns the DOM and the
//! event loop; every state change goes through [`WasmEditor`].

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::error::GridError;
use crate::export::{self, TextFormat};
use crate::palettes;
use crate::reference::ReferenceImage;
use crate::session::Session;
use crate::view::{self, CanvasGeometry, ViewState};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Names of the built-in palettes.
#[wasm_bindgen(js_name = listPalettes)]
pub fn list_palettes() -> Vec<String> {
    palettes::list_builtins().into_iter().map(String::from).collect()
}

/// Canvas pixels per cell for the current viewport width.
#[wasm_bindgen(js_name = cellPixelSize)]
pub fn cell_pixel_size(viewport_width: u32, grid_size: usize) -> u32 {
    view::cell_pixel_size(viewport_width, grid_size)
}

/// A painting session bound to one canvas.
#[wasm_bindgen]
pub struct WasmEditor {
    session: Session,
    view: ViewState,
    geometry: CanvasGeometry,
    format: TextFormat,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor for a built-in palette (`"wplace"` if empty).
    #[wasm_bindgen(constructor)]
    pub fn new(palette: &str, grid_size: usize) -> Result<WasmEditor, JsValue> {
        let name = if palette.is_empty() { palettes::DEFAULT_PALETTE } else { palette };
        let palette =
            palettes::get_builtin(name).ok_or_else(|| js_error(GridError::UnknownPalette(name.to_string())))?;
        let session = Session::new(Arc::new(palette), grid_size).map_err(js_error)?;
        let geometry = CanvasGeometry::new(grid_size, view::MIN_CELL_PX);
        Ok(WasmEditor { session, view: ViewState::default(), geometry, format: TextFormat::default() })
    }

    #[wasm_bindgen(getter, js_name = gridSize)]
    pub fn grid_size(&self) -> usize {
        self.session.grid_size()
    }

    /// Resize the grid, discarding every cell.
    #[wasm_bindgen(js_name = setGridSize)]
    pub fn set_grid_size(&mut self, size: usize) -> Result<(), JsValue> {
        self.session.set_grid_size(size).map_err(js_error)?;
        self.geometry = CanvasGeometry::new(size, self.geometry.cell_px);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Palette entries as JSON: `[{"code","color","name"}, ...]`.
    #[wasm_bindgen(js_name = paletteJson)]
    pub fn palette_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.palette().entries()).map_err(js_error)
    }

    #[wasm_bindgen(getter, js_name = currentColor)]
    pub fn current_color(&self) -> String {
        self.session.current_color().to_string()
    }

    #[wasm_bindgen(js_name = setCurrentColor)]
    pub fn set_current_color(&mut self, code: &str) -> Result<(), JsValue> {
        self.session.set_current_color(code).map_err(js_error)
    }

    /// Paint one cell with the current color.
    pub fn paint(&mut self, x: usize, y: usize) -> Result<(), JsValue> {
        self.session.paint(x, y).map_err(js_error)
    }

    /// Write a code (or erase with `undefined`) at a cell.
    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&mut self, x: usize, y: usize, code: Option<String>) -> Result<(), JsValue> {
        self.session.set_cell(x, y, code.as_deref()).map_err(js_error)
    }

    /// Code at a cell, `undefined` when empty.
    #[wasm_bindgen(js_name = getCell)]
    pub fn get_cell(&self, x: usize, y: usize) -> Result<Option<String>, JsValue> {
        self.session.get_cell(x, y).map(|c| c.map(String::from)).map_err(js_error)
    }

    /// Load a reference from raw RGBA pixels (e.g. canvas `ImageData`).
    #[wasm_bindgen(js_name = loadReference)]
    pub fn load_reference(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsValue> {
        let reference = ReferenceImage::from_rgba(width, height, pixels).map_err(js_error)?;
        self.session.load_reference(reference);
        Ok(())
    }

    /// Load a reference from encoded image bytes (PNG, JPEG, ...).
    #[wasm_bindgen(js_name = loadReferenceBytes)]
    pub fn load_reference_bytes(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let reference = ReferenceImage::decode(bytes).map_err(js_error)?;
        self.session.load_reference(reference);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearReference)]
    pub fn clear_reference(&mut self) {
        self.session.clear_reference();
    }

    #[wasm_bindgen(getter, js_name = hasReference)]
    pub fn has_reference(&self) -> bool {
        self.session.reference().is_some()
    }

    /// Queue a conversion; call `runPendingConversion` after the UI repaints.
    #[wasm_bindgen(js_name = requestConversion)]
    pub fn request_conversion(&mut self) -> Result<(), JsValue> {
        self.session.request_conversion().map_err(js_error)
    }

    #[wasm_bindgen(getter, js_name = conversionPending)]
    pub fn conversion_pending(&self) -> bool {
        self.session.is_conversion_pending()
    }

    /// Run a queued conversion; returns whether one ran.
    #[wasm_bindgen(js_name = runPendingConversion)]
    pub fn run_pending_conversion(&mut self) -> Result<bool, JsValue> {
        self.session.run_pending_conversion().map(|s| s.is_some()).map_err(js_error)
    }

    /// Stats as JSON: `{"filled_count","empty_count","fill_percent"}`.
    pub fn stats(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.stats()).map_err(js_error)
    }

    /// Per-color usage as JSON.
    #[wasm_bindgen(js_name = colorCounts)]
    pub fn color_counts(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.color_counts()).map_err(js_error)
    }

    /// Use `delimiter` between text cells; an empty string restores the default.
    #[wasm_bindgen(js_name = setTextDelimiter)]
    pub fn set_text_delimiter(&mut self, delimiter: &str) -> Result<(), JsValue> {
        self.format = TextFormat::from_delimiter(Some(delimiter)).map_err(js_error)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = exportText)]
    pub fn export_text(&self) -> String {
        self.session.export_text(self.format)
    }

    /// Replace the grid with one parsed from text; the size follows the text.
    #[wasm_bindgen(js_name = importText)]
    pub fn import_text(&mut self, text: &str) -> Result<(), JsValue> {
        let grid = export::decode_text(text, self.session.palette(), self.format).map_err(js_error)?;
        let size = grid.size();
        self.session.set_grid_size(size).map_err(js_error)?;
        for (y, row) in grid.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(index) = cell {
                    let code = self.session.palette().entry(*index).code.clone();
                    self.session.set_cell(x, y, Some(&code)).map_err(js_error)?;
                }
            }
        }
        self.geometry = CanvasGeometry::new(size, self.geometry.cell_px);
        Ok(())
    }

    /// True-resolution PNG bytes.
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.session.export_png().map_err(js_error)
    }

    /// `data:image/png;base64,...` of the true-resolution raster.
    #[wasm_bindgen(js_name = pngDataUrl)]
    pub fn png_data_url(&self) -> Result<String, JsValue> {
        export::png_data_url(&self.session.engine().to_image()).map_err(js_error)
    }

    /// Download name for the text export; `timestamp_ms` is `Date.now()`.
    #[wasm_bindgen(js_name = textFileName)]
    pub fn text_file_name(&self, timestamp_ms: f64) -> String {
        export::text_file_name(self.session.grid_size(), timestamp_ms as u128)
    }

    #[wasm_bindgen(js_name = pngFileName)]
    pub fn png_file_name(&self, timestamp_ms: f64) -> String {
        export::png_file_name(self.session.grid_size(), timestamp_ms as u128)
    }

    // View state

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> f32 {
        self.view.zoom_in()
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> f32 {
        self.view.zoom_out()
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&mut self) -> f32 {
        self.view.reset_zoom()
    }

    pub fn wheel(&mut self, delta_y: f64) -> f32 {
        self.view.wheel(delta_y)
    }

    #[wasm_bindgen(js_name = zoomLabel)]
    pub fn zoom_label(&self) -> String {
        self.view.zoom_label()
    }

    #[wasm_bindgen(js_name = toggleGrid)]
    pub fn toggle_grid(&mut self) -> bool {
        self.view.toggle_grid()
    }

    #[wasm_bindgen(js_name = setReferenceOpacity)]
    pub fn set_reference_opacity(&mut self, opacity: f32) {
        self.view.set_reference_opacity(opacity);
    }

    /// Where the canvas is displayed, from `getBoundingClientRect()`.
    #[wasm_bindgen(js_name = setCanvasRect)]
    pub fn set_canvas_rect(&mut self, left: f64, top: f64, width: f64, height: f64, cell_px: u32) {
        self.geometry =
            CanvasGeometry::new(self.session.grid_size(), cell_px).with_display(left, top, width, height);
    }

    /// Press: starts a stroke and paints the cell under the pointer.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) -> bool {
        let cell = self.cell_at(client_x, client_y);
        let target = self.view.pointer_down(cell);
        self.paint_target(target)
    }

    /// Move: paints only while a stroke is active.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        let cell = self.cell_at(client_x, client_y);
        let target = self.view.pointer_move(cell);
        self.paint_target(target)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.view.pointer_up();
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.view.pointer_leave();
    }

    /// Tooltip for the cell under the pointer, `undefined` off-grid.
    #[wasm_bindgen(js_name = hoverLabel)]
    pub fn hover_label(&self, client_x: f64, client_y: f64) -> Option<String> {
        let (x, y) = self.cell_at(client_x, client_y)?;
        view::hover_label(self.session.engine(), x, y)
    }

    /// RGBA pixels of the editing preview at the current canvas cell size.
    #[wasm_bindgen(js_name = renderPreview)]
    pub fn render_preview(&self) -> Result<Vec<u8>, JsValue> {
        view::render_preview(
            self.session.engine(),
            self.session.reference(),
            &self.view,
            self.geometry.cell_px,
        )
        .map(|canvas| canvas.into_raw())
        .map_err(js_error)
    }
}

impl WasmEditor {
    fn cell_at(&self, client_x: f64, client_y: f64) -> Option<(usize, usize)> {
        self.geometry.pointer_to_cell(client_x, client_y, self.session.grid_size())
    }

    fn paint_target(&mut self, target: Option<(usize, usize)>) -> bool {
        match target {
            Some((x, y)) => self.session.paint(x, y).is_ok(),
            None => false,
        }
    }
}
