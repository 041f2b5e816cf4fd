//! Editing session: the engine plus everything a painting UI drives it with.
//!
//! Conversion runs in two steps. [`Session::request_conversion`] only
//! records the request, which gives the caller a chance to show a "working"
//! indicator. [`Session::run_pending_conversion`] then runs it to completion.
//! Several requests before a run collapse into one.

use std::sync::Arc;

use crate::config::PlacerConfig;
use crate::engine::GridEngine;
use crate::error::GridError;
use crate::export::TextFormat;
use crate::palette::Palette;
use crate::palettes;
use crate::quantize::ALPHA_THRESHOLD;
use crate::reference::ReferenceImage;
use crate::stats::{ColorCounts, Stats};

/// One user's editing state.
#[derive(Debug, Clone)]
pub struct Session {
    engine: GridEngine,
    reference: Option<ReferenceImage>,
    current_color: String,
    alpha_threshold: u8,
    conversion_pending: bool,
}

impl Session {
    /// New session painting with the palette's first opaque color.
    pub fn new(palette: Arc<Palette>, grid_size: usize) -> Result<Self, GridError> {
        let current_color = palette
            .opaque()
            .next()
            .map(|(_, entry, _)| entry.code.clone())
            .unwrap_or_else(|| palette.eraser().code.clone());
        Ok(Self {
            engine: GridEngine::new(palette, grid_size)?,
            reference: None,
            current_color,
            alpha_threshold: ALPHA_THRESHOLD,
            conversion_pending: false,
        })
    }

    /// Session configured from `placer.toml` settings.
    pub fn from_config(config: &PlacerConfig) -> Result<Self, GridError> {
        let palette = palettes::get_builtin(&config.editor.palette)
            .ok_or_else(|| GridError::UnknownPalette(config.editor.palette.clone()))?;
        let mut session = Self::new(Arc::new(palette), config.editor.grid_size)?;
        session.set_current_color(&config.editor.current_color)?;
        session.alpha_threshold = config.quantize.alpha_threshold;
        Ok(session)
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn palette(&self) -> &Arc<Palette> {
        self.engine.palette()
    }

    pub fn grid_size(&self) -> usize {
        self.engine.size()
    }

    /// Resize the grid, discarding every cell.
    pub fn set_grid_size(&mut self, size: usize) -> Result<(), GridError> {
        self.engine.resize(size)
    }

    pub fn clear(&mut self) {
        self.engine.clear();
    }

    pub fn current_color(&self) -> &str {
        &self.current_color
    }

    /// Select the code written by [`Session::paint`]; the eraser is allowed.
    pub fn set_current_color(&mut self, code: &str) -> Result<(), GridError> {
        self.engine.palette().lookup(code)?;
        self.current_color = code.to_string();
        Ok(())
    }

    pub fn set_alpha_threshold(&mut self, alpha_threshold: u8) {
        self.alpha_threshold = alpha_threshold;
    }

    /// Paint one cell with the current color.
    pub fn paint(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        let code = self.current_color.clone();
        self.engine.set_cell(x, y, Some(&code))
    }

    /// Direct cell write, bypassing the current color.
    pub fn set_cell(&mut self, x: usize, y: usize, code: Option<&str>) -> Result<(), GridError> {
        self.engine.set_cell(x, y, code)
    }

    pub fn get_cell(&self, x: usize, y: usize) -> Result<Option<&str>, GridError> {
        self.engine.get_cell(x, y)
    }

    pub fn reference(&self) -> Option<&ReferenceImage> {
        self.reference.as_ref()
    }

    pub fn load_reference(&mut self, reference: ReferenceImage) {
        log::info!("reference image loaded ({}x{})", reference.width(), reference.height());
        self.reference = Some(reference);
    }

    pub fn clear_reference(&mut self) {
        self.reference = None;
    }

    /// Queue a conversion of the reference image into the grid.
    pub fn request_conversion(&mut self) -> Result<(), GridError> {
        if self.reference.is_none() {
            return Err(GridError::NoReferenceImage);
        }
        if self.conversion_pending {
            log::debug!("conversion already pending, requests merged");
        }
        self.conversion_pending = true;
        Ok(())
    }

    pub fn is_conversion_pending(&self) -> bool {
        self.conversion_pending
    }

    /// Run a queued conversion. `Ok(None)` when nothing was queued.
    ///
    /// The grid size at run time is used, not the size at request time.
    pub fn run_pending_conversion(&mut self) -> Result<Option<Stats>, GridError> {
        if !self.conversion_pending {
            return Ok(None);
        }
        self.conversion_pending = false;

        let reference = self.reference.as_ref().ok_or(GridError::NoReferenceImage)?;
        self.engine.quantize_from(reference.image(), self.alpha_threshold);
        Ok(Some(self.engine.compute_stats()))
    }

    /// Request and immediately run a conversion.
    pub fn convert_now(&mut self) -> Result<Stats, GridError> {
        self.request_conversion()?;
        self.run_pending_conversion()?.ok_or(GridError::NoReferenceImage)
    }

    pub fn stats(&self) -> Stats {
        self.engine.compute_stats()
    }

    pub fn color_counts(&self) -> ColorCounts {
        self.engine.color_counts()
    }

    pub fn export_text(&self, format: TextFormat) -> String {
        self.engine.to_text(format)
    }

    pub fn export_png(&self) -> Result<Vec<u8>, image::ImageError> {
        self.engine.to_png()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn session(size: usize) -> Session {
        Session::new(Arc::new(palettes::wplace()), size).unwrap()
    }

    fn solid(width: u32, height: u32, pixel: Rgba<u8>) -> ReferenceImage {
        ReferenceImage::from_image(RgbaImage::from_pixel(width, height, pixel)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let session = session(8);
        assert_eq!(session.current_color(), "K");
        assert_eq!(session.grid_size(), 8);
        assert!(session.reference().is_none());
        assert!(!session.is_conversion_pending());
    }

    #[test]
    fn test_paint_uses_current_color() {
        let mut session = session(4);
        session.paint(0, 0).unwrap();
        session.set_current_color("Y").unwrap();
        session.paint(1, 0).unwrap();
        assert_eq!(session.get_cell(0, 0), Ok(Some("K")));
        assert_eq!(session.get_cell(1, 0), Ok(Some("Y")));

        session.set_current_color("E").unwrap();
        session.paint(0, 0).unwrap();
        assert_eq!(session.get_cell(0, 0), Ok(None));
    }

    #[test]
    fn test_unknown_current_color_rejected() {
        let mut session = session(4);
        assert_eq!(
            session.set_current_color("XX"),
            Err(GridError::UnknownColorCode("XX".to_string()))
        );
        assert_eq!(session.current_color(), "K");
    }

    #[test]
    fn test_paint_out_of_bounds() {
        let mut session = session(4);
        assert!(matches!(session.paint(4, 4), Err(GridError::OutOfBounds { .. })));
        assert_eq!(session.stats().filled_count, 0);
    }

    #[test]
    fn test_conversion_without_reference() {
        let mut session = session(4);
        assert_eq!(session.request_conversion(), Err(GridError::NoReferenceImage));
        assert_eq!(session.run_pending_conversion(), Ok(None));
        assert_eq!(session.convert_now(), Err(GridError::NoReferenceImage));
    }

    #[test]
    fn test_conversion_is_deferred_until_run() {
        let mut session = session(4);
        session.load_reference(solid(10, 10, Rgba([0, 0, 0, 255])));
        session.request_conversion().unwrap();
        session.request_conversion().unwrap();
        assert!(session.is_conversion_pending());
        assert_eq!(session.stats().filled_count, 0);

        let stats = session.run_pending_conversion().unwrap().expect("conversion should run");
        assert_eq!(stats.filled_count, 16);
        assert!(!session.is_conversion_pending());
        // merged requests ran once
        assert_eq!(session.run_pending_conversion(), Ok(None));
    }

    #[test]
    fn test_reference_cleared_before_run() {
        let mut session = session(4);
        session.load_reference(solid(4, 4, Rgba([255, 0, 0, 255])));
        session.request_conversion().unwrap();
        session.clear_reference();
        assert_eq!(session.run_pending_conversion(), Err(GridError::NoReferenceImage));
        assert!(!session.is_conversion_pending());
    }

    #[test]
    fn test_conversion_uses_size_at_run_time() {
        let mut session = session(4);
        session.load_reference(solid(3, 3, Rgba([255, 0, 0, 255])));
        session.request_conversion().unwrap();
        session.set_grid_size(6).unwrap();
        let stats = session.run_pending_conversion().unwrap().unwrap();
        assert_eq!(stats.filled_count, 36);
        assert_eq!(session.get_cell(5, 5), Ok(Some("R")));
    }

    #[test]
    fn test_alpha_threshold_applies() {
        let mut session = session(2);
        session.load_reference(solid(2, 2, Rgba([0, 0, 0, 100])));
        session.set_alpha_threshold(101);
        assert_eq!(session.convert_now().unwrap().filled_count, 0);
        session.set_alpha_threshold(100);
        assert_eq!(session.convert_now().unwrap().filled_count, 4);
    }

    #[test]
    fn test_from_config() {
        let mut config = PlacerConfig::default();
        config.editor.palette = "grayscale".to_string();
        config.editor.grid_size = 12;
        config.editor.current_color = "3".to_string();
        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.palette().name(), "grayscale");
        assert_eq!(session.grid_size(), 12);
        assert_eq!(session.current_color(), "3");
    }
}
