//! DDS container reading and writing.

use super::compress::{decode_level, encode_level, level_size};
use crate::error::{AtlasError, Result};
use crate::types::TextureFormat;
use ddsfile::{AlphaMode, D3D10ResourceDimension, D3DFormat, Dds, DxgiFormat, NewDxgiParams};
use image::RgbaImage;
use std::path::Path;

/// DXGI format written to the DX10 header.
pub fn dxgi_format(format: TextureFormat) -> DxgiFormat {
    match format {
        TextureFormat::Rgba8 => DxgiFormat::R8G8B8A8_UNorm,
        TextureFormat::Bgra8 => DxgiFormat::B8G8R8A8_UNorm,
        TextureFormat::Bc1 => DxgiFormat::BC1_UNorm,
        TextureFormat::Bc2 => DxgiFormat::BC2_UNorm,
        TextureFormat::Bc3 => DxgiFormat::BC3_UNorm,
        TextureFormat::Bc4 => DxgiFormat::BC4_UNorm,
        TextureFormat::Bc5 => DxgiFormat::BC5_UNorm,
    }
}

/// Format a DDS file's pixel data is stored in, if it is one that can be
/// decoded back to RGBA8.
fn stored_format(dds: &Dds) -> Option<TextureFormat> {
    if let Some(dxgi) = dds.get_dxgi_format() {
        return match dxgi {
            DxgiFormat::BC1_Typeless | DxgiFormat::BC1_UNorm | DxgiFormat::BC1_UNorm_sRGB => {
                Some(TextureFormat::Bc1)
            }
            DxgiFormat::BC2_Typeless | DxgiFormat::BC2_UNorm | DxgiFormat::BC2_UNorm_sRGB => {
                Some(TextureFormat::Bc2)
            }
            DxgiFormat::BC3_Typeless | DxgiFormat::BC3_UNorm | DxgiFormat::BC3_UNorm_sRGB => {
                Some(TextureFormat::Bc3)
            }
            DxgiFormat::BC4_Typeless | DxgiFormat::BC4_UNorm | DxgiFormat::BC4_SNorm => {
                Some(TextureFormat::Bc4)
            }
            DxgiFormat::BC5_Typeless | DxgiFormat::BC5_UNorm | DxgiFormat::BC5_SNorm => {
                Some(TextureFormat::Bc5)
            }
            DxgiFormat::B8G8R8A8_Typeless
            | DxgiFormat::B8G8R8A8_UNorm
            | DxgiFormat::B8G8R8A8_UNorm_sRGB => Some(TextureFormat::Bgra8),
            DxgiFormat::R8G8B8A8_Typeless
            | DxgiFormat::R8G8B8A8_UNorm
            | DxgiFormat::R8G8B8A8_UNorm_sRGB => Some(TextureFormat::Rgba8),
            _ => None,
        };
    }

    match dds.get_d3d_format() {
        Some(D3DFormat::DXT1) => Some(TextureFormat::Bc1),
        Some(D3DFormat::DXT2) | Some(D3DFormat::DXT3) => Some(TextureFormat::Bc2),
        Some(D3DFormat::DXT4) | Some(D3DFormat::DXT5) => Some(TextureFormat::Bc3),
        Some(D3DFormat::A8R8G8B8) => Some(TextureFormat::Bgra8),
        Some(D3DFormat::A8B8G8R8) => Some(TextureFormat::Rgba8),
        _ => None,
    }
}

/// Closest output format to the one a DDS file was stored in.
pub fn texture_format_of(dds: &Dds) -> TextureFormat {
    stored_format(dds).unwrap_or_default()
}

/// Decode the top mip level of a DDS file to RGBA8, along with the format
/// it was stored in.
pub fn decode_dds(path: &Path) -> Result<(RgbaImage, TextureFormat)> {
    let decode_err = |message: String| AtlasError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let file = std::fs::File::open(path)?;
    let dds = Dds::read(std::io::BufReader::new(file)).map_err(|e| decode_err(e.to_string()))?;
    let format = stored_format(&dds).ok_or_else(|| {
        decode_err(format!(
            "unsupported DDS pixel format (dxgi: {:?}, d3d: {:?})",
            dds.get_dxgi_format(),
            dds.get_d3d_format()
        ))
    })?;

    let (width, height) = (dds.get_width(), dds.get_height());
    let size = level_size(format, width, height);
    let data = dds
        .data
        .get(..size)
        .ok_or_else(|| decode_err(format!("{} bytes of pixel data, expected {}", dds.data.len(), size)))?;

    let rgba = decode_level(data, format, width, height);
    let img = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| decode_err("decoded level does not match its size".to_string()))?;
    Ok((img, format))
}

/// Encode a mip chain (level 0 first) into a DDS file image.
pub fn encode_dds(levels: &[RgbaImage], format: TextureFormat) -> Result<Vec<u8>> {
    let base = levels
        .first()
        .ok_or_else(|| AtlasError::Texture("no mip levels to write".to_string()))?;

    let mut dds = Dds::new_dxgi(NewDxgiParams {
        height: base.height(),
        width: base.width(),
        depth: None,
        format: dxgi_format(format),
        mipmap_levels: Some(levels.len() as u32),
        array_layers: None,
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Straight,
    })
    .map_err(|e| AtlasError::Texture(format!("Failed to create DDS header: {}", e)))?;

    let expected: usize = levels
        .iter()
        .map(|l| level_size(format, l.width(), l.height()))
        .sum();
    let mut data = Vec::with_capacity(expected);
    for level in levels {
        data.extend(encode_level(level, format));
    }
    if data.len() != dds.data.len() {
        return Err(AtlasError::Texture(format!(
            "encoded {} bytes but the DDS layout expects {}",
            data.len(),
            dds.data.len()
        )));
    }
    dds.data = data;

    let mut bytes = Vec::new();
    dds.write(&mut bytes)
        .map_err(|e| AtlasError::Texture(format!("Failed to write DDS: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::mipmap::generate_mip_chain;

    fn gradient(edge: u32) -> RgbaImage {
        RgbaImage::from_fn(edge, edge, |x, y| image::Rgba([(x * 10) as u8, (y * 10) as u8, 0, 255]))
    }

    #[test]
    fn test_uncompressed_round_trip_header() {
        let chain = generate_mip_chain(gradient(20));
        let bytes = encode_dds(&chain, TextureFormat::Rgba8).unwrap();

        let dds = Dds::read(&bytes[..]).unwrap();
        assert_eq!(dds.get_width(), 20);
        assert_eq!(dds.get_height(), 20);
        assert_eq!(dds.get_num_mipmap_levels(), 5);
        assert_eq!(dds.get_dxgi_format(), Some(DxgiFormat::R8G8B8A8_UNorm));
        assert_eq!(&dds.data[..4], &[0, 0, 0, 255]);
        assert_eq!(texture_format_of(&dds), TextureFormat::Rgba8);
    }

    #[test]
    fn test_compressed_with_mips() {
        let chain = generate_mip_chain(gradient(24));
        let bytes = encode_dds(&chain, TextureFormat::Bc3).unwrap();

        let dds = Dds::read(&bytes[..]).unwrap();
        assert_eq!(dds.get_num_mipmap_levels(), 5);
        assert_eq!(texture_format_of(&dds), TextureFormat::Bc3);
    }

    #[test]
    fn test_single_level() {
        let bytes = encode_dds(&[gradient(8)], TextureFormat::Bc1).unwrap();
        let dds = Dds::read(&bytes[..]).unwrap();
        assert_eq!(dds.get_num_mipmap_levels(), 1);
        assert_eq!(dds.data.len(), 4 * 8);
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(matches!(
            encode_dds(&[], TextureFormat::Rgba8),
            Err(AtlasError::Texture(_))
        ));
    }

    #[test]
    fn test_decode_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let solid = RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
        for format in TextureFormat::ALL {
            let path = dir.path().join(format!("{}.dds", format));
            let chain = generate_mip_chain(solid.clone());
            std::fs::write(&path, encode_dds(&chain, format).unwrap()).unwrap();

            let (img, stored) = decode_dds(&path).unwrap();
            assert_eq!(stored, format);
            assert_eq!(img.dimensions(), (8, 8));
            // Single-channel BC4 keeps only red; the rest keep red and alpha
            assert_eq!(img.get_pixel(3, 3).0[0], 255, "{}", format);
        }
    }

    #[test]
    fn test_decode_uncompressed_exact() {
        let dir = tempfile::tempdir().unwrap();
        for format in [TextureFormat::Rgba8, TextureFormat::Bgra8] {
            let path = dir.path().join(format!("{}.dds", format));
            std::fs::write(&path, encode_dds(&[gradient(4)], format).unwrap()).unwrap();
            let (img, _) = decode_dds(&path).unwrap();
            assert_eq!(img, gradient(4));
        }
    }

    #[test]
    fn test_decode_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.dds");
        std::fs::write(&path, b"DDS nonsense").unwrap();
        assert!(matches!(decode_dds(&path), Err(AtlasError::Decode { .. })));
    }
}
