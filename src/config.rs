//! Atlas job configuration.

use crate::error::{AtlasError, Result};
use crate::types::TextureFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default block alignment for the canvas edge (BCn blocks are 4x4).
pub const DEFAULT_BLOCK_ALIGN: u32 = 4;

/// Default border around each cell, in pixels.
pub const DEFAULT_BORDER: u32 = 1;

/// Default glyph pixel size when none is given.
pub const DEFAULT_FONT_SIZE: f32 = 32.0;

/// Layout and output settings for one atlas build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Nominal cell size. `None` detects it from the widest element.
    pub cell_size: Option<u32>,
    /// Padding on each side of every cell.
    pub border: u32,
    /// The canvas edge is rounded up to a multiple of this.
    pub block_align: u32,
    /// Output format. `None` picks the source's native format.
    pub format: Option<TextureFormat>,
    /// Generate the full mip chain before writing.
    pub generate_mipmaps: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            cell_size: None,
            border: DEFAULT_BORDER,
            block_align: DEFAULT_BLOCK_ALIGN,
            format: None,
            generate_mipmaps: true,
        }
    }
}

impl AtlasConfig {
    /// Load a job file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a job description from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AtlasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set a fixed cell size. Zero means auto-detect.
    pub fn with_cell_size(mut self, size: u32) -> Self {
        self.cell_size = if size == 0 { None } else { Some(size) };
        self
    }

    /// Set the border width.
    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    /// Set the block alignment.
    pub fn with_block_align(mut self, align: u32) -> Self {
        self.block_align = align;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Enable or disable mip-map generation.
    pub fn with_mipmaps(mut self, enabled: bool) -> Self {
        self.generate_mipmaps = enabled;
        self
    }

    /// Reject settings no layout can satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.block_align == 0 {
            return Err(AtlasError::Config("block_align must be at least 1".to_string()));
        }
        if self.cell_size == Some(0) {
            return Err(AtlasError::Config(
                "cell_size must be positive (omit it to auto-detect)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for rendering numbered glyph elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontOptions {
    /// Font file path or family name.
    pub family: String,
    /// Glyph pixel size.
    pub size: f32,
    /// Number of elements; element `i` shows the text of `i`.
    pub count: u32,
    pub bold: bool,
    pub italic: bool,
    /// Shadow offset in pixels (0 disables the shadow pass).
    pub shadow: u32,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            family: String::new(),
            size: DEFAULT_FONT_SIZE,
            count: 0,
            bold: false,
            italic: false,
            shadow: 0,
        }
    }
}

impl FontOptions {
    /// Options for `count` glyph elements rendered from `family`.
    pub fn new(family: impl Into<String>, count: u32) -> Self {
        Self {
            family: family.into(),
            count,
            ..Self::default()
        }
    }

    /// Set the glyph pixel size. Zero keeps the default.
    pub fn with_size(mut self, size: f32) -> Self {
        if size > 0.0 {
            self.size = size;
        }
        self
    }

    /// Set bold and italic style flags.
    pub fn with_style(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }

    /// Set the shadow offset.
    pub fn with_shadow(mut self, shadow: u32) -> Self {
        self.shadow = shadow;
        self
    }
}
