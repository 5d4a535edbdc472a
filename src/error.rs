//! Error types.

use thiserror::Error;

/// Pixel data could not be obtained from an image.
///
/// Never surfaced by the extraction entry points: they recover with
/// [`FALLBACK`](crate::FALLBACK).
#[derive(Debug, Error)]
pub enum ImageReadError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("image has no pixels")]
    Empty,

    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    Truncated { expected: usize, actual: usize },

    #[error("pixel data unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced to callers.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// No override, no cached palette and no image for the identifier.
    #[error("no override, cached palette or image for `{0}`")]
    MissingSource(String),

    #[error("scope name `{0}` has no usable characters")]
    InvalidScope(String),

    #[error("invalid color `{0}`, expected #RRGGBB")]
    InvalidColor(String),

    #[error("invalid extraction options: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for theme operations.
pub type Result<T> = std::result::Result<T, ThemeError>;
