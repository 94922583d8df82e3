//! Numbered glyph elements rendered from a font.
//!
//! Element `i` shows the decimal text of `i` in white, optionally over a
//! black drop shadow. Bold and italic are synthesized from the coverage
//! mask when the font file is not already a styled face.

use super::font_lookup::{resolve_font, ResolvedFont};
use super::{ElementOutcome, ElementSource, SkippedElement};
use crate::atlas::glyph_name;
use crate::config::FontOptions;
use crate::error::{AtlasError, Result};
use crate::types::AtlasElement;
use fontdue::{Font, FontSettings};
use log::{debug, info};

/// Horizontal shear applied for synthetic italics (x shift per row of height).
const ITALIC_SLANT: f32 = 0.2;

/// 8-bit coverage mask text is rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CoverageMask {
    /// Create an empty mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Coverage at (x, y), zero outside the mask.
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Merge coverage at (x, y), keeping the stronger value. Clips silently.
    pub fn add(&mut self, x: i64, y: i64, value: u8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = self.data[idx].max(value);
    }

    /// Thicken strokes by smearing coverage `amount` pixels to the right.
    pub fn embolden(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        let source = self.clone();
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                let strongest = (0..=amount as i64)
                    .map(|dx| source.get(x - dx, y))
                    .max()
                    .unwrap_or(0);
                self.add(x, y, strongest);
            }
        }
    }

    /// Slant to the right, shifting the top row by `slant * height` pixels
    /// and the bottom row not at all.
    pub fn shear(&mut self, slant: f32) {
        let source = self.clone();
        self.data.fill(0);
        for y in 0..self.height as i64 {
            let shift = ((self.height as i64 - 1 - y) as f32 * slant).round() as i64;
            for x in 0..self.width as i64 {
                self.add(x + shift, y, source.get(x, y));
            }
        }
    }
}

/// Measures and renders text coverage.
pub trait TextRasterizer {
    /// Size of the box `text` occupies, (width, height) in pixels.
    fn measure(&self, text: &str) -> (u32, u32);

    /// Render `text` into `mask` with the box's top-left at (x, y).
    fn render(&self, text: &str, mask: &mut CoverageMask, x: i64, y: i64);
}

/// [`TextRasterizer`] backed by a fontdue font.
pub struct FontdueRasterizer {
    font: Font,
    px: f32,
    ascent: f32,
    line_height: f32,
}

impl FontdueRasterizer {
    /// Load a font from TTF/OTF bytes at a pixel size.
    pub fn from_bytes(data: &[u8], px: f32) -> Result<Self> {
        if px.is_nan() || px <= 0.0 {
            return Err(AtlasError::Font(format!("Invalid font size: {}", px)));
        }
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| AtlasError::Font(format!("Failed to load font: {}", e)))?;

        let metrics = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| AtlasError::Font("Cannot get line metrics".to_string()))?;

        debug!(
            "Font metrics at {}px: ascent={:.1}, descent={:.1}",
            px, metrics.ascent, metrics.descent
        );

        Ok(Self {
            font,
            px,
            ascent: metrics.ascent,
            line_height: metrics.ascent - metrics.descent,
        })
    }

    fn extent(&self, text: &str) -> (f32, f32) {
        horizontal_extent(text.chars().map(|ch| {
            let m = self.font.metrics(ch, self.px);
            (m.xmin, m.width, m.advance_width)
        }))
    }
}

/// Horizontal (left, right) bounds of a glyph run with the pen starting at
/// zero, given each glyph's (xmin, bitmap width, advance). `left` is never
/// above zero and `right` never below the final pen position.
fn horizontal_extent(glyphs: impl IntoIterator<Item = (i32, usize, f32)>) -> (f32, f32) {
    let mut pen = 0.0f32;
    let mut left = 0.0f32;
    let mut right = 0.0f32;
    for (xmin, width, advance) in glyphs {
        left = left.min(pen + xmin as f32);
        right = right.max(pen + xmin as f32 + width as f32);
        pen += advance;
    }
    (left, right.max(pen))
}

impl TextRasterizer for FontdueRasterizer {
    fn measure(&self, text: &str) -> (u32, u32) {
        let (left, right) = self.extent(text);
        ((right - left).ceil() as u32, self.line_height.ceil() as u32)
    }

    fn render(&self, text: &str, mask: &mut CoverageMask, x: i64, y: i64) {
        // Start far enough right that a negative left bearing stays inside the box
        let mut pen = -self.extent(text).0;
        for ch in text.chars() {
            let (m, bitmap) = self.font.rasterize(ch, self.px);
            // fontdue's ymin is the bitmap bottom relative to the baseline, +y up
            let left = x + (pen + m.xmin as f32).round() as i64;
            let top = y + (self.ascent - (m.ymin as f32 + m.height as f32)).round() as i64;
            for row in 0..m.height {
                for col in 0..m.width {
                    mask.add(left + col as i64, top + row as i64, bitmap[row * m.width + col]);
                }
            }
            pen += m.advance_width;
        }
    }
}

/// Renders the numbers `0..count` as atlas elements.
pub struct GlyphSource<R> {
    rasterizer: R,
    options: FontOptions,
    synthetic_bold: bool,
    synthetic_italic: bool,
}

impl GlyphSource<FontdueRasterizer> {
    /// Resolve the font named in `options` and prepare a fontdue rasterizer.
    pub fn load(options: FontOptions) -> Result<Self> {
        let ResolvedFont {
            path,
            data,
            is_bold,
            is_italic,
        } = resolve_font(&options.family, options.bold, options.italic)?;
        let rasterizer = FontdueRasterizer::from_bytes(&data, options.size)?;

        let source = Self::new(rasterizer, options, is_bold, is_italic);
        info!(
            "Rendering {} glyphs from {} at {}px (synthetic bold: {}, synthetic italic: {})",
            source.options.count,
            path.display(),
            source.options.size,
            source.synthetic_bold,
            source.synthetic_italic
        );
        Ok(source)
    }
}

impl<R: TextRasterizer> GlyphSource<R> {
    /// Wrap a rasterizer. `face_bold`/`face_italic` say which requested
    /// styles the font already provides; the rest are synthesized.
    pub fn new(rasterizer: R, options: FontOptions, face_bold: bool, face_italic: bool) -> Self {
        Self {
            synthetic_bold: options.bold && !face_bold,
            synthetic_italic: options.italic && !face_italic,
            rasterizer,
            options,
        }
    }

    /// Text rendered for element `index`.
    pub fn text(index: usize) -> String {
        index.to_string()
    }

    fn bold_amount(&self) -> u32 {
        if self.synthetic_bold {
            ((self.options.size / 24.0).round() as u32).max(1)
        } else {
            0
        }
    }

    fn render_element(&self, index: usize) -> std::result::Result<AtlasElement, String> {
        let name = glyph_name(index as u32, self.options.count);
        let text = Self::text(index);

        let (text_w, text_h) = self.rasterizer.measure(&text);
        if text_w == 0 || text_h == 0 {
            return Err(format!("text '{}' has no visible extent", text));
        }

        let bold = self.bold_amount();
        let slant = if self.synthetic_italic {
            (text_h as f32 * ITALIC_SLANT).ceil() as u32
        } else {
            0
        };
        let shadow = self.options.shadow;
        let width = text_w + bold + slant + shadow;
        let height = text_h + shadow;

        let mut mask = CoverageMask::new(width, height);
        self.rasterizer.render(&text, &mut mask, 0, 0);
        mask.embolden(bold);
        if self.synthetic_italic {
            mask.shear(ITALIC_SLANT);
        }

        Ok(AtlasElement::new(name, width, height, shade(&mask, shadow)))
    }
}

/// White text over an optional black shadow offset by `shadow` pixels.
fn shade(mask: &CoverageMask, shadow: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(mask.data.len() * 4);
    let offset = shadow as i64;
    for y in 0..mask.height as i64 {
        for x in 0..mask.width as i64 {
            let text = mask.get(x, y) as u32;
            let under = if shadow > 0 {
                mask.get(x - offset, y - offset) as u32
            } else {
                0
            };
            // "over" compositing of white text onto the black shadow
            let alpha = text + under * (255 - text) / 255;
            let value = if alpha == 0 { 0 } else { text * 255 / alpha };
            let value = value.min(255) as u8;
            pixels.extend_from_slice(&[value, value, value, alpha.min(255) as u8]);
        }
    }
    pixels
}

impl<R: TextRasterizer> ElementSource for GlyphSource<R> {
    fn len(&self) -> usize {
        self.options.count as usize
    }

    fn produce(&mut self, index: usize) -> ElementOutcome {
        match self.render_element(index) {
            Ok(element) => ElementOutcome::Produced(element),
            Err(reason) => ElementOutcome::Skipped(SkippedElement {
                name: glyph_name(index as u32, self.options.count),
                reason,
            }),
        }
    }

    fn auto_cell_size(&self, elements: &super::CollectedElements) -> Option<u32> {
        elements.max_extent()
    }
}
