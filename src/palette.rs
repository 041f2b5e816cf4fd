//! Palette catalog: the fixed, ordered set of paintable colors.
//!
//! A [`Palette`] is built once and shared immutably (usually behind an
//! `Arc`) by the grid engine, the quantizer and any renderer. Every catalog
//! carries exactly one transparent entry, the eraser, which is assignable but
//! never takes part in color matching.

use std::collections::HashMap;

use image::Rgb;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::color::{parse_color, to_hex, ColorError};
use crate::error::GridError;

/// Index of an entry within its palette.
pub type PaletteIndex = u16;

/// Error type for catalog construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No entries at all
    #[error("palette '{0}' has no entries")]
    Empty(String),
    /// Entry with an empty code
    #[error("entry {0} has an empty code")]
    EmptyCode(usize),
    /// Two entries share a code
    #[error("duplicate color code '{0}'")]
    DuplicateCode(String),
    /// Not exactly one transparent entry
    #[error("palette must have exactly one transparent eraser entry, found {0}")]
    EraserCount(usize),
    /// Too many entries to index
    #[error("palette has {0} entries, at most {max} are supported", max = PaletteIndex::MAX)]
    TooLarge(usize),
    /// Color literal that didn't parse
    #[error("color for '{code}': {source}")]
    Color { code: String, source: ColorError },
}

/// What a palette entry paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    /// An opaque color
    Rgb(Rgb<u8>),
    /// The eraser: paints "no fill"
    Transparent,
}

impl Swatch {
    /// The opaque color, if any.
    pub fn rgb(&self) -> Option<Rgb<u8>> {
        match self {
            Swatch::Rgb(rgb) => Some(*rgb),
            Swatch::Transparent => None,
        }
    }

    /// CSS-style literal: `#rrggbb` or `transparent`.
    pub fn to_css(&self) -> String {
        match self {
            Swatch::Rgb(rgb) => to_hex(*rgb),
            Swatch::Transparent => "transparent".to_string(),
        }
    }
}

impl Serialize for Swatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

/// A single named color in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub code: String,
    #[serde(rename = "color")]
    pub swatch: Swatch,
    pub name: String,
}

impl PaletteEntry {
    pub fn new(code: impl Into<String>, swatch: Swatch, name: impl Into<String>) -> Self {
        Self { code: code.into(), swatch, name: name.into() }
    }

    pub fn is_eraser(&self) -> bool {
        self.swatch == Swatch::Transparent
    }
}

/// An immutable, ordered color catalog with O(1) code lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    entries: Vec<PaletteEntry>,
    index: HashMap<String, PaletteIndex>,
    eraser: PaletteIndex,
}

impl Palette {
    /// Build a catalog, validating code uniqueness and the single eraser.
    pub fn new(name: impl Into<String>, entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        let name = name.into();
        if entries.is_empty() {
            return Err(PaletteError::Empty(name));
        }
        if entries.len() > PaletteIndex::MAX as usize {
            return Err(PaletteError::TooLarge(entries.len()));
        }

        let mut index = HashMap::with_capacity(entries.len());
        let mut erasers = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.code.is_empty() {
                return Err(PaletteError::EmptyCode(i));
            }
            if index.insert(entry.code.clone(), i as PaletteIndex).is_some() {
                return Err(PaletteError::DuplicateCode(entry.code.clone()));
            }
            if entry.is_eraser() {
                erasers.push(i as PaletteIndex);
            }
        }

        let eraser = match erasers.as_slice() {
            [single] => *single,
            _ => return Err(PaletteError::EraserCount(erasers.len())),
        };

        Ok(Self { name, entries, index, eraser })
    }

    /// Build a catalog from `(code, color literal, display name)` rows.
    ///
    /// Any literal with alpha 0 (e.g. `transparent`) becomes the eraser.
    pub fn from_table(name: &str, rows: &[(&str, &str, &str)]) -> Result<Self, PaletteError> {
        let entries = rows
            .iter()
            .map(|(code, literal, display)| {
                let rgba = parse_color(literal).map_err(|source| PaletteError::Color {
                    code: code.to_string(),
                    source,
                })?;
                let swatch = if rgba[3] == 0 {
                    Swatch::Transparent
                } else {
                    Swatch::Rgb(Rgb([rgba[0], rgba[1], rgba[2]]))
                };
                Ok(PaletteEntry::new(*code, swatch, *display))
            })
            .collect::<Result<Vec<_>, PaletteError>>()?;
        Self::new(name, entries)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by code.
    pub fn lookup(&self, code: &str) -> Result<&PaletteEntry, GridError> {
        self.index_of(code).map(|i| &self.entries[i as usize])
    }

    /// Position of `code` in the catalog.
    pub fn index_of(&self, code: &str) -> Result<PaletteIndex, GridError> {
        self.index.get(code).copied().ok_or_else(|| GridError::UnknownColorCode(code.to_string()))
    }

    /// Entry at a catalog position. Indices come from this palette, so
    /// out-of-range values are a programming error.
    pub fn entry(&self, index: PaletteIndex) -> &PaletteEntry {
        &self.entries[index as usize]
    }

    pub fn eraser(&self) -> &PaletteEntry {
        &self.entries[self.eraser as usize]
    }

    pub fn eraser_index(&self) -> PaletteIndex {
        self.eraser
    }

    /// Opaque entries with their colors, in catalog order.
    pub fn opaque(&self) -> impl Iterator<Item = (PaletteIndex, &PaletteEntry, Rgb<u8>)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.swatch.rgb().map(|rgb| (i as PaletteIndex, e, rgb)))
    }
}
