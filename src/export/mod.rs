//! Texture output: mip chain, block compression and file writing.
//!
//! The composited canvas is handed over here once composition finishes.
//! The texture is written first, then the `.inc` sidecar next to it.

pub mod compress;
pub mod dds;
pub mod mipmap;

pub use self::dds::encode_dds;
pub use mipmap::generate_mip_chain;

use crate::atlas::{sidecar_path, Canvas};
use crate::error::Result;
use crate::types::TextureFormat;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// How the canvas is turned into a texture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: TextureFormat,
    pub generate_mipmaps: bool,
    /// Also write a PNG of the uncompressed canvas.
    pub preview: bool,
}

/// Files produced by [`write_atlas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenAtlas {
    pub texture_path: PathBuf,
    pub sidecar_path: PathBuf,
    pub preview_path: Option<PathBuf>,
    pub format: TextureFormat,
    pub mip_levels: u32,
    pub texture_bytes: usize,
}

/// Encode the canvas as a DDS file image, returning the bytes and mip count.
pub fn encode_texture(
    canvas: Canvas,
    format: TextureFormat,
    generate_mipmaps: bool,
) -> Result<(Vec<u8>, u32)> {
    let base = canvas.into_rgba_image()?;
    let levels = if generate_mipmaps {
        generate_mip_chain(base)
    } else {
        vec![base]
    };
    let bytes = encode_dds(&levels, format)?;
    Ok((bytes, levels.len() as u32))
}

/// Write the texture to `path` and the sidecar text next to it.
pub fn write_atlas(
    canvas: Canvas,
    sidecar: &str,
    path: &Path,
    options: ExportOptions,
) -> Result<WrittenAtlas> {
    let preview_path = if options.preview {
        let png_path = preview_path(path);
        fs::write(&png_path, canvas.to_png()?)?;
        info!("Wrote preview to {:?}", png_path);
        Some(png_path)
    } else {
        None
    };

    let (bytes, mip_levels) = encode_texture(canvas, options.format, options.generate_mipmaps)?;
    fs::write(path, &bytes)?;
    info!(
        "Wrote {} texture ({} bytes, {} mip levels) to {:?}",
        options.format,
        bytes.len(),
        mip_levels,
        path
    );

    let sidecar_path = sidecar_path(path);
    fs::write(&sidecar_path, sidecar)?;
    info!("Wrote UV sidecar to {:?}", sidecar_path);

    Ok(WrittenAtlas {
        texture_path: path.to_path_buf(),
        sidecar_path,
        preview_path,
        format: options.format,
        mip_levels,
        texture_bytes: bytes.len(),
    })
}

/// Preview path for a texture path (`atlas.dds` -> `atlas.preview.png`).
pub fn preview_path(texture_path: &Path) -> PathBuf {
    texture_path.with_extension("preview.png")
}
