//! Error types for logoloc.

use thiserror::Error;

/// Result alias for logoloc operations.
pub type LogoLocResult<T> = std::result::Result<T, LogoLocError>;

/// Errors that can occur when running logoloc algorithms.
///
/// A logo that is simply not found is *not* an error; the locator reports
/// that outcome as `Ok(None)`. These variants cover invalid inputs and
/// infrastructure failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LogoLocError {
    /// Image dimensions are zero or overflow addressing.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the image width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is too small for the described image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A requested region does not fit inside the image.
    #[error("roi ({x},{y}) {width}x{height} out of bounds for {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template cannot be matched (e.g. zero intensity variance).
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Too few point correspondences for the requested transform model.
    #[error("too few points: need {needed}, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    /// A linear solve or matrix inversion failed.
    #[error("numerical failure: {reason}")]
    NumericalFailure { reason: &'static str },
    /// RANSAC consensus did not reach the configured inlier count.
    #[error("insufficient inliers: need {needed}, found {found}")]
    InsufficientInliers { needed: usize, found: usize },
    /// Profile lookup miss in the store.
    #[error("profile not found: {name}")]
    ProfileNotFound { name: String },
    /// Profile store I/O or serialization failure.
    #[error("profile store error: {reason}")]
    ProfileStore { reason: String },
    /// Image decoding failure.
    #[cfg(feature = "image-io")]
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
