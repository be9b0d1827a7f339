//! Image pyramid for multi-scale keypoint detection.
//!
//! Each level halves the previous one with a 2x2 box filter and rounding:
//! `dst = (a + b + c + d + 2) / 4`. Keypoints detected at level `l` map back
//! to base coordinates by multiplying with `2^l`.

use crate::image::{ImageView, OwnedImage};
use crate::util::LogoLocResult;

/// Owned image pyramid built from a base level.
pub struct ImagePyramid {
    levels: Vec<OwnedImage>,
}

impl ImagePyramid {
    /// Builds a pyramid from a base grayscale view.
    ///
    /// `max_levels` is clamped to at least 1 so the base level is always
    /// present; construction stops early once a level would drop below 2
    /// pixels on either side.
    pub fn build(base: ImageView<'_>, max_levels: usize) -> LogoLocResult<Self> {
        let max_levels = max_levels.max(1);
        let mut levels = vec![OwnedImage::from_view(base)];

        while levels.len() < max_levels {
            let src = levels.last().expect("levels is not empty").view();
            if src.width() < 2 || src.height() < 2 {
                break;
            }

            let dst_width = src.width() / 2;
            let dst_height = src.height() / 2;
            let mut dst = vec![0u8; dst_width * dst_height];
            for y in 0..dst_height {
                let row0 = src.row(2 * y).expect("row within source bounds");
                let row1 = src.row(2 * y + 1).expect("row within source bounds");
                for x in 0..dst_width {
                    let sum = u16::from(row0[2 * x])
                        + u16::from(row0[2 * x + 1])
                        + u16::from(row1[2 * x])
                        + u16::from(row1[2 * x + 1]);
                    dst[y * dst_width + x] = ((sum + 2) / 4) as u8;
                }
            }
            levels.push(OwnedImage::new(dst, dst_width, dst_height)?);
        }

        Ok(Self { levels })
    }

    /// Returns the number of levels (level 0 is the base resolution).
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_>> {
        self.levels.get(index).map(|img| img.view())
    }

    /// Returns the scale factor mapping level coordinates to base coordinates.
    pub fn scale_to_base(&self, index: usize) -> f64 {
        (1usize << index) as f64
    }
}
