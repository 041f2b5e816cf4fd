//! Configuration schema types for `placer.toml`
//!
//! Every section and field is optional; a missing file behaves exactly like
//! an empty one.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::TextFormat;
use crate::grid::MAX_GRID_SIZE;
use crate::palettes;
use crate::quantize::ALPHA_THRESHOLD;

/// Largest integer upscale accepted for PNG export.
pub const MAX_EXPORT_SCALE: u32 = 64;

/// Editor defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Built-in palette name
    #[serde(default = "default_palette")]
    pub palette: String,
    /// Cells per side
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    /// Code painted on the next stroke
    #[serde(default = "default_current_color")]
    pub current_color: String,
    /// Reference underlay opacity, 0.0-1.0
    #[serde(default = "default_reference_opacity")]
    pub reference_opacity: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            grid_size: default_grid_size(),
            current_color: default_current_color(),
            reference_opacity: default_reference_opacity(),
        }
    }
}

fn default_palette() -> String {
    palettes::DEFAULT_PALETTE.to_string()
}

fn default_grid_size() -> usize {
    40
}

fn default_current_color() -> String {
    "K".to_string()
}

fn default_reference_opacity() -> f32 {
    0.3
}

/// Auto-conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizeConfig {
    /// Texels with alpha below this become empty cells
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self { alpha_threshold: default_alpha_threshold() }
    }
}

fn default_alpha_threshold() -> u8 {
    ALPHA_THRESHOLD
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output directory
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Cell separator for text exports; empty keeps codes concatenated
    #[serde(default)]
    pub text_delimiter: String,
    /// Integer nearest-neighbor upscale for PNG export
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { out: default_out(), text_delimiter: String::new(), scale: default_scale() }
    }
}

impl ExportConfig {
    /// Text layout selected by `text_delimiter`.
    pub fn text_format(&self) -> Result<TextFormat, String> {
        TextFormat::from_delimiter(Some(&self.text_delimiter))
    }
}

fn default_out() -> PathBuf {
    PathBuf::from(".")
}

fn default_scale() -> u32 {
    1
}

/// Root `placer.toml` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacerConfig {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub quantize: QuantizeConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "editor.grid_size")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "placer.toml: '{}' {}", self.field, self.message)
    }
}

impl PlacerConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message })
        };

        let palette = palettes::get_builtin(&self.editor.palette);
        match &palette {
            None => push(
                "editor.palette",
                format!(
                    "unknown palette '{}', expected one of: {}",
                    self.editor.palette,
                    palettes::list_builtins().join(", ")
                ),
            ),
            Some(p) => {
                if p.lookup(&self.editor.current_color).is_err() {
                    push(
                        "editor.current_color",
                        format!(
                            "'{}' is not a code in palette '{}'",
                            self.editor.current_color, self.editor.palette
                        ),
                    );
                }
            }
        }

        if self.editor.grid_size == 0 || self.editor.grid_size > MAX_GRID_SIZE {
            push("editor.grid_size", format!("must be between 1 and {}", MAX_GRID_SIZE));
        }

        if !(0.0..=1.0).contains(&self.editor.reference_opacity) {
            push("editor.reference_opacity", "must be between 0.0 and 1.0".to_string());
        }

        if let Err(message) = self.export.text_format() {
            push("export.text_delimiter", message);
        }

        if self.export.scale == 0 || self.export.scale > MAX_EXPORT_SCALE {
            push("export.scale", format!("must be between 1 and {}", MAX_EXPORT_SCALE));
        }

        errors
    }
}
