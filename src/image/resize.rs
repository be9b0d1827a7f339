//! Bilinear resampling for the template scale sweep.

use crate::image::{ImageView, OwnedImage};
use crate::util::{LogoLocError, LogoLocResult};

/// Resamples a view to `dst_width x dst_height` with bilinear interpolation.
///
/// Source coordinates use pixel-center alignment, so identity-size resampling
/// reproduces the input exactly.
pub fn resize_bilinear(
    src: ImageView<'_>,
    dst_width: usize,
    dst_height: usize,
) -> LogoLocResult<OwnedImage> {
    if dst_width == 0 || dst_height == 0 {
        return Err(LogoLocError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        });
    }

    let src_width = src.width();
    let src_height = src.height();
    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    let mut dst = Vec::with_capacity(dst_width * dst_height);
    for dy in 0..dst_height {
        let sy = ((dy as f32 + 0.5) * y_ratio - 0.5).max(0.0);
        let y0 = (sy as usize).min(src_height - 1);
        let y1 = (y0 + 1).min(src_height - 1);
        let fy = sy - y0 as f32;
        let row0 = src.row(y0).expect("row within source bounds");
        let row1 = src.row(y1).expect("row within source bounds");

        for dx in 0..dst_width {
            let sx = ((dx as f32 + 0.5) * x_ratio - 0.5).max(0.0);
            let x0 = (sx as usize).min(src_width - 1);
            let x1 = (x0 + 1).min(src_width - 1);
            let fx = sx - x0 as f32;

            let top = row0[x0] as f32 * (1.0 - fx) + row0[x1] as f32 * fx;
            let bot = row1[x0] as f32 * (1.0 - fx) + row1[x1] as f32 * fx;
            let value = top * (1.0 - fy) + bot * fy;
            dst.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    OwnedImage::new(dst, dst_width, dst_height)
}

/// Resamples a view by a uniform scale factor, rounding target dimensions.
pub fn resize_by_factor(src: ImageView<'_>, factor: f64) -> LogoLocResult<OwnedImage> {
    let dst_width = (src.width() as f64 * factor).round() as usize;
    let dst_height = (src.height() as f64 * factor).round() as usize;
    resize_bilinear(src, dst_width, dst_height)
}
