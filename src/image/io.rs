//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{LogoLocError, LogoLocResult};
use std::path::Path;

/// Converts a decoded dynamic image to an owned grayscale image.
pub fn owned_from_dynamic(img: &image::DynamicImage) -> LogoLocResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Decodes raw encoded bytes (PNG, JPEG) to an owned grayscale image.
pub fn decode_gray_image(bytes: &[u8]) -> LogoLocResult<OwnedImage> {
    let img = image::load_from_memory(bytes).map_err(|err| LogoLocError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic(&img)
}

/// Loads an image from disk and converts it to an owned grayscale image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> LogoLocResult<OwnedImage> {
    let img = image::open(path).map_err(|err| LogoLocError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic(&img)
}
