//! Places atlas elements into their grid cells on a shared canvas.

use super::layout::LayoutPlan;
use crate::error::{AtlasError, Result};
use crate::types::{AtlasElement, UvEntry};
use image::ImageEncoder;
use std::collections::HashSet;

/// Square RGBA8 pixel buffer the atlas is composited into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// Edge length in pixels (the canvas is square).
    pub edge: u32,
    /// RGBA pixel data, row-major.
    pub pixels: Vec<u8>,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(edge: u32) -> Self {
        Self {
            edge,
            pixels: vec![0; edge as usize * edge as usize * 4],
        }
    }

    /// Create a canvas sized for a layout plan.
    pub fn for_plan(plan: &LayoutPlan) -> Self {
        Self::new(plan.canvas_edge)
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.edge as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Copy an element's full pixel rectangle with its top-left at (x, y).
    fn blit(&mut self, element: &AtlasElement, x: u32, y: u32) {
        let row_bytes = element.width as usize * 4;
        let edge = self.edge as usize;
        for row in 0..element.height as usize {
            let src = row * row_bytes;
            let dst = ((y as usize + row) * edge + x as usize) * 4;
            self.pixels[dst..dst + row_bytes].copy_from_slice(&element.pixels[src..src + row_bytes]);
        }
    }

    /// Convert to an `image` buffer for resizing and encoding.
    pub fn into_rgba_image(self) -> Result<image::RgbaImage> {
        image::RgbaImage::from_raw(self.edge, self.edge, self.pixels)
            .ok_or_else(|| AtlasError::Texture("canvas buffer does not match its edge".to_string()))
    }

    /// Export the canvas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(
                &self.pixels,
                self.edge,
                self.edge,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| AtlasError::Texture(format!("Failed to encode PNG: {}", e)))?;

        Ok(bytes)
    }
}

/// Composite `elements` into `canvas` in the order given, one grid cell each.
///
/// Elements narrower or shorter than the cell are centered within it; the
/// returned entries record the cell corner, not the centered pixel offset.
/// The whole batch is checked before any pixel is written, so the canvas
/// is untouched when an error is returned.
pub fn compose(
    canvas: &mut Canvas,
    plan: &LayoutPlan,
    elements: impl IntoIterator<Item = AtlasElement>,
) -> Result<Vec<UvEntry>> {
    if canvas.edge != plan.canvas_edge {
        return Err(AtlasError::InvalidLayout(format!(
            "canvas is {}px but the plan needs {}px",
            canvas.edge, plan.canvas_edge
        )));
    }

    let elements: Vec<AtlasElement> = elements.into_iter().collect();
    check_batch(plan, &elements)?;

    let edge = plan.canvas_edge as f32;
    let span = plan.uv_span();
    let mut entries = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        let (x, y) = plan.cell_origin(index);
        let x_off = x + (plan.cell_size - element.width) / 2;
        let y_off = y + (plan.cell_size - element.height) / 2;
        canvas.blit(&element, x_off, y_off);

        entries.push(UvEntry {
            name: element.name,
            u: x as f32 / edge,
            v: y as f32 / edge,
            u_span: span,
            v_span: span,
        });
    }

    Ok(entries)
}

/// Reject a batch that does not fit the plan: too many elements, oversize or
/// malformed elements, or names that collide ignoring case.
fn check_batch(plan: &LayoutPlan, elements: &[AtlasElement]) -> Result<()> {
    if elements.len() > plan.element_count as usize {
        return Err(AtlasError::InvalidLayout(format!(
            "more elements than the {} planned cells",
            plan.element_count
        )));
    }

    let mut seen = HashSet::new();
    for element in elements {
        if element.width > plan.cell_size || element.height > plan.cell_size {
            return Err(AtlasError::ElementTooLarge {
                name: element.name.clone(),
                width: element.width,
                height: element.height,
                cell_size: plan.cell_size,
            });
        }
        if !element.is_consistent() {
            return Err(AtlasError::InvalidLayout(format!(
                "element '{}' has {} bytes for {}x{} pixels",
                element.name,
                element.pixels.len(),
                element.width,
                element.height
            )));
        }
        if !seen.insert(element.name.to_lowercase()) {
            return Err(AtlasError::DuplicateElement(element.name.clone()));
        }
    }
    Ok(())
}
