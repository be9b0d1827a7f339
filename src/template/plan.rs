//! Template plan precomputation for normalized cross-correlation.

use crate::image::ImageView;
use crate::util::{LogoLocError, LogoLocResult};

/// Precomputed zero-mean buffer and statistics for one (scaled) template.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    area: f32,
    var_t: f32,
    zero_mean: Vec<f32>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Fails with `DegenerateTemplate` when the template has (near) zero
    /// intensity variance; such a template correlates equally everywhere.
    pub fn from_view(tpl: ImageView<'_>) -> LogoLocResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width * height;

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).expect("row within template bounds");
            for &value in row {
                let v = f64::from(value);
                sum += v;
                sum_sq += v * v;
            }
        }

        let count_f = count as f64;
        let mean = sum / count_f;
        let variance = sum_sq / count_f - mean * mean;
        if variance <= 1e-8 {
            return Err(LogoLocError::DegenerateTemplate {
                reason: "zero intensity variance",
            });
        }

        let mut zero_mean = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).expect("row within template bounds");
            for &value in row {
                zero_mean.push((f64::from(value) - mean) as f32);
            }
        }

        Ok(Self {
            width,
            height,
            area: count as f32,
            var_t: (variance * count_f) as f32,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel count as a float.
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Returns the sum of squared zero-mean values.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f32] {
        &self.zero_mean
    }
}
