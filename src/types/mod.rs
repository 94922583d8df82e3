//! Shared types used throughout the library.

mod format;

pub use format::TextureFormat;

/// A named RGBA8 image to be placed in one atlas cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasElement {
    /// Logical name written to the sidecar (already normalised).
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel data, row-major (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl AtlasElement {
    /// Create a new element from RGBA data.
    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixels,
        }
    }

    /// Create an element filled with a single color.
    pub fn solid(name: impl Into<String>, width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = (0..width * height).flat_map(|_| color).collect();
        Self::new(name, width, height, pixels)
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Whether the buffer length matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == (self.width as usize) * (self.height as usize) * 4
    }

    /// Larger of width and height.
    pub fn max_extent(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Normalized placement of one element inside the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct UvEntry {
    /// Element name; empty for the shared-span entry.
    pub name: String,
    /// Left edge of the cell (0-1).
    pub u: f32,
    /// Top edge of the cell (0-1).
    pub v: f32,
    /// Cell width in UV space.
    pub u_span: f32,
    /// Cell height in UV space.
    pub v_span: f32,
}

impl UvEntry {
    /// The synthetic entry carrying the span shared by every cell.
    pub fn common_span(span: f32) -> Self {
        Self {
            name: String::new(),
            u: span,
            v: span,
            u_span: span,
            v_span: span,
        }
    }

    /// Whether this is the shared-span entry.
    pub fn is_common(&self) -> bool {
        self.name.is_empty()
    }

    /// Right edge of the cell.
    pub fn u_max(&self) -> f32 {
        self.u + self.u_span
    }

    /// Bottom edge of the cell.
    pub fn v_max(&self) -> f32 {
        self.v + self.v_span
    }

    /// Transform a local UV coordinate (0-1) to atlas coordinate.
    pub fn transform_uv(&self, u: f32, v: f32) -> [f32; 2] {
        [self.u + u * self.u_span, self.v + v * self.v_span]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_element() {
        let element = AtlasElement::solid("red", 3, 2, [255, 0, 0, 255]);
        assert_eq!(element.pixels.len(), 3 * 2 * 4);
        assert!(element.is_consistent());
        assert_eq!(element.get_pixel(2, 1), [255, 0, 0, 255]);
        assert_eq!(element.max_extent(), 3);
    }

    #[test]
    fn test_get_pixel() {
        let element = AtlasElement::new(
            "quad",
            2,
            2,
            vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255],
        );

        assert_eq!(element.get_pixel(0, 0), [255, 0, 0, 255]); // Red
        assert_eq!(element.get_pixel(1, 0), [0, 255, 0, 255]); // Green
        assert_eq!(element.get_pixel(0, 1), [0, 0, 255, 255]); // Blue
        assert_eq!(element.get_pixel(1, 1), [255, 255, 255, 255]); // White
    }

    #[test]
    fn test_uv_entry_transform() {
        let entry = UvEntry {
            name: "icon".to_string(),
            u: 0.25,
            v: 0.5,
            u_span: 0.25,
            v_span: 0.25,
        };

        let [u, v] = entry.transform_uv(0.0, 0.0);
        assert!((u - 0.25).abs() < 0.001);
        assert!((v - 0.5).abs() < 0.001);

        let [u, v] = entry.transform_uv(1.0, 1.0);
        assert!((u - 0.5).abs() < 0.001);
        assert!((v - 0.75).abs() < 0.001);
        assert!(!entry.is_common());
    }

    #[test]
    fn test_common_span_entry() {
        let entry = UvEntry::common_span(0.4);
        assert!(entry.is_common());
        assert_eq!(entry.u, 0.4);
        assert_eq!(entry.v_span, 0.4);
    }
}
