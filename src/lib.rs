//! # Atlas Tool
//!
//! Packs a set of equally sized images, or numbers rendered from a font,
//! into one square grid texture plus a sidecar mapping each name to its UV
//! placement.
//!
//! ## Overview
//!
//! Elements come from an [`ElementSource`]. The [`AtlasBuilder`] collects
//! them, plans a square grid whose edge is aligned to the compression block
//! size, composites every element into its cell and records the cell's UV.
//! The resulting [`AtlasOutput`] is written as a DDS texture (optionally
//! mip-mapped and block compressed) with a `.inc` sidecar next to it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use atlas_tool::{AtlasBuilder, AtlasConfig, ImageSource};
//!
//! let mut source = ImageSource::from_directory("icons")?;
//! let output = AtlasBuilder::with_config(AtlasConfig::default().with_border(1))
//!     .build(&mut source)?;
//! output.write("icons.dds", false)?;
//! ```
//!
//! ## Sidecar format
//!
//! ```text
//! { "", { 0.4, 0.4 } },
//! { "aegis", { 0.05, 0.05 } },
//! ```
//!
//! The first line holds the span shared by every cell, each following line
//! the top-left UV of one element.

pub mod error;
pub mod types;
pub mod config;
pub mod atlas;
pub mod source;
pub mod export;
pub mod pipeline;

// Re-export main types for convenience
pub use error::{AtlasError, Result};
pub use types::{AtlasElement, TextureFormat, UvEntry};
pub use config::{AtlasConfig, FontOptions};
pub use atlas::{compose, serialize_sidecar, Canvas, LayoutPlan};
pub use source::{ElementOutcome, ElementSource, GlyphSource, ImageSource, SkippedElement};
pub use export::{ExportOptions, WrittenAtlas};
pub use pipeline::{AtlasBuilder, AtlasOutput};

/// Build an atlas from the supported image files in a directory.
pub fn atlas_from_directory<P: AsRef<std::path::Path>>(
    dir: P,
    config: AtlasConfig,
) -> Result<AtlasOutput> {
    let mut source = ImageSource::from_directory(dir)?;
    AtlasBuilder::with_config(config).build(&mut source)
}

/// Build an atlas from an explicit list of image files. Unsupported
/// extensions are ignored.
pub fn atlas_from_files<I, P>(paths: I, config: AtlasConfig) -> Result<AtlasOutput>
where
    I: IntoIterator<Item = P>,
    P: Into<std::path::PathBuf>,
{
    let mut source = ImageSource::from_files(paths);
    AtlasBuilder::with_config(config).build(&mut source)
}

/// Build an atlas of the numbers `0..options.count` rendered from a font.
pub fn atlas_from_font(options: FontOptions, config: AtlasConfig) -> Result<AtlasOutput> {
    let mut source = GlyphSource::load(options)?;
    AtlasBuilder::with_config(config).build(&mut source)
}
