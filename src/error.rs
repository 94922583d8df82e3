//! Error types for the atlas tool.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using AtlasError.
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Main error type for atlas building operations.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON job file.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Layout parameters cannot produce a grid.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// No element survived loading, so there is nothing to size the atlas by.
    #[error("No atlas elements to pack")]
    EmptyInputSet,

    /// An element does not fit in its grid cell.
    #[error("Element '{name}' is {width}x{height}, larger than the {cell_size}px cell")]
    ElementTooLarge {
        name: String,
        width: u32,
        height: u32,
        cell_size: u32,
    },

    /// Two elements map to the same (case-insensitive) name.
    #[error("Duplicate atlas element name: {0}")]
    DuplicateElement(String),

    /// A single input could not be decoded.
    #[error("Failed to decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Font lookup or rasterization failed.
    #[error("Font error: {0}")]
    Font(String),

    /// Mip-map generation, compression or container serialization failed.
    #[error("Texture error: {0}")]
    Texture(String),

    /// Invalid job configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
