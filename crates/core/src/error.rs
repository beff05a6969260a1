//! Error types for ruler planning and rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the canvas-ruler library.
#[derive(Error, Debug)]
pub enum RulerError {
    /// A glyph or icon asset could not be read or decoded.
    #[error("Failed to load ruler asset '{path}': {message}")]
    AssetLoad { path: PathBuf, message: String },

    /// The view transform cannot produce a ruler (zero zoom, NaN offsets...).
    #[error("Invalid view state: {0}")]
    InvalidViewState(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration key that the ruler does not know about.
    #[error("Unknown configuration key: {0}")]
    UnknownConfigKey(String),

    /// A label asked for a character the glyph atlas does not carry.
    #[error("No glyph for character {0:?} in ruler atlas")]
    UnknownGlyph(char),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncodingError(String),

    /// The snapping service could not resolve a point.
    #[error("Snapping unavailable: {0}")]
    SnapUnavailable(String),

    /// Filesystem error outside of asset loading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration (de)serialization failed.
    #[error("Configuration serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, RulerError>;
