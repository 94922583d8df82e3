//! Output pixel formats for the atlas texture.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pixel format of the written atlas texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFormat {
    /// Uncompressed 8-bit RGBA.
    #[default]
    Rgba8,
    /// Uncompressed 8-bit BGRA.
    Bgra8,
    /// BC1 (DXT1), 4bpp, 1-bit alpha.
    Bc1,
    /// BC2 (DXT3), explicit 4-bit alpha.
    Bc2,
    /// BC3 (DXT5), interpolated alpha.
    Bc3,
    /// BC4, single red channel.
    Bc4,
    /// BC5, red and green channels.
    Bc5,
}

impl TextureFormat {
    /// All supported formats.
    pub const ALL: [TextureFormat; 7] = [
        TextureFormat::Rgba8,
        TextureFormat::Bgra8,
        TextureFormat::Bc1,
        TextureFormat::Bc2,
        TextureFormat::Bc3,
        TextureFormat::Bc4,
        TextureFormat::Bc5,
    ];

    /// Whether this format is block compressed.
    pub fn is_compressed(&self) -> bool {
        !matches!(self, TextureFormat::Rgba8 | TextureFormat::Bgra8)
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            TextureFormat::Rgba8 => "rgba8",
            TextureFormat::Bgra8 => "bgra8",
            TextureFormat::Bc1 => "bc1",
            TextureFormat::Bc2 => "bc2",
            TextureFormat::Bc3 => "bc3",
            TextureFormat::Bc4 => "bc4",
            TextureFormat::Bc5 => "bc5",
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        // Accept the DXT aliases as well.
        let canonical = match lower.as_str() {
            "dxt1" => "bc1",
            "dxt3" => "bc2",
            "dxt5" => "bc3",
            other => other,
        };
        TextureFormat::ALL
            .iter()
            .copied()
            .find(|f| f.name() == canonical)
            .ok_or_else(|| format!("Unknown texture format: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("bc3".parse::<TextureFormat>().unwrap(), TextureFormat::Bc3);
        assert_eq!("RGBA8".parse::<TextureFormat>().unwrap(), TextureFormat::Rgba8);
        assert_eq!("dxt1".parse::<TextureFormat>().unwrap(), TextureFormat::Bc1);
        assert!("bc7".parse::<TextureFormat>().is_err());
    }

    #[test]
    fn test_compressed_flag() {
        assert!(!TextureFormat::Rgba8.is_compressed());
        assert!(!TextureFormat::Bgra8.is_compressed());
        assert!(TextureFormat::Bc1.is_compressed());
        assert!(TextureFormat::Bc5.is_compressed());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TextureFormat::Bc2).unwrap();
        assert_eq!(json, "\"bc2\"");
        let back: TextureFormat = serde_json::from_str("\"bgra8\"").unwrap();
        assert_eq!(back, TextureFormat::Bgra8);
    }
}
