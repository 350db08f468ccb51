//! Error types for Marcher

use thiserror::Error;

/// Result type alias using Marcher's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Marcher operations
#[derive(Error, Debug)]
pub enum Error {
    /// Width or height is zero or negative
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// Row stride cannot hold a full row of pixels
    #[error("Invalid stride: {stride} bytes, need at least {min}")]
    InvalidStride { stride: usize, min: usize },

    /// Buffer is shorter than height * stride
    #[error("Buffer too small: {len} bytes, need {required}")]
    BufferTooSmall { len: usize, required: usize },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
