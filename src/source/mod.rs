//! Element sources: where atlas cells get their pixels from.
//!
//! A source knows how many elements it can offer and produces them one at a
//! time. Decoding image files and rasterizing numbered glyphs are the two
//! implementations; the compositor never needs to know which one it got.

pub mod font_lookup;
pub mod glyphs;
pub mod images;

pub use glyphs::{FontdueRasterizer, GlyphSource, TextRasterizer};
pub use images::{ImageSource, SUPPORTED_EXTENSIONS};

use crate::types::{AtlasElement, TextureFormat};
use log::warn;

/// Result of asking a source for one element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementOutcome {
    /// The element is ready for composition.
    Produced(AtlasElement),
    /// The element could not be produced and is left out of the atlas.
    Skipped(SkippedElement),
}

/// An element a source failed to produce, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    /// Name the element would have had.
    pub name: String,
    /// Human readable reason.
    pub reason: String,
}

/// Supplies atlas elements by index.
pub trait ElementSource {
    /// Number of elements this source can be asked for.
    fn len(&self) -> usize;

    /// Produce the element at `index` (`0..len()`).
    fn produce(&mut self, index: usize) -> ElementOutcome;

    /// Format to write when none was requested.
    ///
    /// Only meaningful after elements have been produced.
    fn default_format(&self) -> TextureFormat {
        TextureFormat::Rgba8
    }

    /// Cell size to use when none was configured.
    fn auto_cell_size(&self, elements: &CollectedElements) -> Option<u32> {
        elements.max_width()
    }

    /// Check if the source has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Elements gathered from a source, in source order.
#[derive(Debug, Default)]
pub struct CollectedElements {
    /// Successfully produced elements.
    pub elements: Vec<AtlasElement>,
    /// Elements left out.
    pub skipped: Vec<SkippedElement>,
}

impl CollectedElements {
    /// Widest element width, used as the cell size when none is given.
    pub fn max_width(&self) -> Option<u32> {
        self.elements.iter().map(|e| e.width).max()
    }

    /// Largest width or height of any element.
    pub fn max_extent(&self) -> Option<u32> {
        self.elements.iter().map(|e| e.max_extent()).max()
    }
}

/// Produce every element of `source`, reporting each skipped one.
pub fn collect_elements<S: ElementSource + ?Sized>(source: &mut S) -> CollectedElements {
    let mut collected = CollectedElements::default();
    for index in 0..source.len() {
        match source.produce(index) {
            ElementOutcome::Produced(element) => collected.elements.push(element),
            ElementOutcome::Skipped(skipped) => {
                warn!("Skipping '{}': {}", skipped.name, skipped.reason);
                collected.skipped.push(skipped);
            }
        }
    }
    collected
}
