//! Mip chain generation.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Number of levels in a full chain for a `width x height` base, down to 1x1.
pub fn full_chain_len(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Build the full mip chain, level 0 first. Each level halves the previous
/// one (rounding down, never below 1) with a triangle filter.
pub fn generate_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let levels = full_chain_len(base.width(), base.height()) as usize;
    let mut chain = Vec::with_capacity(levels);
    chain.push(base);

    while chain.len() < levels {
        let prev = &chain[chain.len() - 1];
        let width = (prev.width() / 2).max(1);
        let height = (prev.height() / 2).max(1);
        let next = imageops::resize(prev, width, height, FilterType::Triangle);
        chain.push(next);
    }

    chain
}
