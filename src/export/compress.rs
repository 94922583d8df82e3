//! Pixel encoding for each output format.

use crate::types::TextureFormat;
use image::RgbaImage;
use texpresso::{Algorithm, Format, Params, COLOUR_WEIGHTS_PERCEPTUAL};

/// Fixed compressor settings; quality is not configurable per run.
fn compression_params() -> Params {
    Params {
        algorithm: Algorithm::ClusterFit,
        weights: COLOUR_WEIGHTS_PERCEPTUAL,
        weigh_colour_by_alpha: true,
    }
}

/// texpresso block format for a compressed output format.
pub fn block_format(format: TextureFormat) -> Option<Format> {
    match format {
        TextureFormat::Bc1 => Some(Format::Bc1),
        TextureFormat::Bc2 => Some(Format::Bc2),
        TextureFormat::Bc3 => Some(Format::Bc3),
        TextureFormat::Bc4 => Some(Format::Bc4),
        TextureFormat::Bc5 => Some(Format::Bc5),
        TextureFormat::Rgba8 | TextureFormat::Bgra8 => None,
    }
}

/// Encoded size in bytes of one `width x height` level.
pub fn level_size(format: TextureFormat, width: u32, height: u32) -> usize {
    match block_format(format) {
        Some(block) => block.compressed_size(width as usize, height as usize),
        None => width as usize * height as usize * 4,
    }
}

/// Encode one mip level in `format`.
pub fn encode_level(level: &RgbaImage, format: TextureFormat) -> Vec<u8> {
    let (width, height) = level.dimensions();
    if let Some(block) = block_format(format) {
        let mut output = vec![0u8; level_size(format, width, height)];
        block.compress(
            level.as_raw(),
            width as usize,
            height as usize,
            compression_params(),
            &mut output,
        );
        return output;
    }

    let mut data = level.as_raw().clone();
    if format == TextureFormat::Bgra8 {
        for pixel in data.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    data
}

/// Decode one level stored in `format` back to RGBA8. `data` must hold
/// exactly [`level_size`] bytes.
pub fn decode_level(data: &[u8], format: TextureFormat, width: u32, height: u32) -> Vec<u8> {
    if let Some(block) = block_format(format) {
        let mut output = vec![0u8; width as usize * height as usize * 4];
        block.decompress(data, width as usize, height as usize, &mut output);
        return output;
    }

    let mut pixels = data.to_vec();
    if format == TextureFormat::Bgra8 {
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_sizes() {
        assert_eq!(level_size(TextureFormat::Rgba8, 20, 20), 20 * 20 * 4);
        // BC1: 8 bytes per 4x4 block
        assert_eq!(level_size(TextureFormat::Bc1, 20, 20), 25 * 8);
        // BC3: 16 bytes per block, partial blocks round up
        assert_eq!(level_size(TextureFormat::Bc3, 5, 5), 4 * 16);
        assert_eq!(level_size(TextureFormat::Bc1, 1, 1), 8);
    }

    #[test]
    fn test_bgra_swizzle() {
        let level = RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]));
        assert_eq!(encode_level(&level, TextureFormat::Bgra8), vec![3, 2, 1, 4]);
        assert_eq!(encode_level(&level, TextureFormat::Rgba8), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_inverts_swizzle() {
        let level = RgbaImage::from_pixel(2, 1, image::Rgba([1, 2, 3, 4]));
        let stored = encode_level(&level, TextureFormat::Bgra8);
        assert_eq!(decode_level(&stored, TextureFormat::Bgra8, 2, 1), level.as_raw().clone());
    }

    #[test]
    fn test_decode_compressed_solid_block() {
        let level = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]));
        let stored = encode_level(&level, TextureFormat::Bc1);
        let pixels = decode_level(&stored, TextureFormat::Bc1, 4, 4);
        assert_eq!(pixels.len(), 4 * 4 * 4);
        assert_eq!(&pixels[..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_compressed_level_length() {
        let level = RgbaImage::from_pixel(8, 8, image::Rgba([200, 100, 50, 255]));
        for format in [TextureFormat::Bc1, TextureFormat::Bc2, TextureFormat::Bc3, TextureFormat::Bc4, TextureFormat::Bc5] {
            let data = encode_level(&level, format);
            assert_eq!(data.len(), level_size(format, 8, 8), "{}", format);
        }
    }

    #[test]
    fn test_compression_deterministic() {
        let mut level = RgbaImage::new(8, 8);
        for (x, y, pixel) in level.enumerate_pixels_mut() {
            *pixel = image::Rgba([(x * 30) as u8, (y * 30) as u8, 128, 255]);
        }
        assert_eq!(
            encode_level(&level, TextureFormat::Bc3),
            encode_level(&level, TextureFormat::Bc3)
        );
    }
}
