//! Dense normalized cross-correlation scan over all placements.

use crate::template::plan::TemplatePlan;
use crate::util::{LogoLocError, LogoLocResult};
use crate::ImageView;

/// Best placement of a scaled template in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Column of the placement's top-left corner.
    pub x: usize,
    /// Row of the placement's top-left corner.
    pub y: usize,
    /// Normalized correlation score in roughly `[-1, 1]`.
    pub score: f32,
}

/// Deterministic ordering: higher score first, then top-left position.
pub(crate) fn placement_better(candidate: &Placement, incumbent: &Placement) -> bool {
    match candidate.score.total_cmp(&incumbent.score) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => {
            (candidate.y, candidate.x) < (incumbent.y, incumbent.x)
        }
    }
}

/// Scans every valid placement and returns the best-scoring one.
///
/// Windows whose intensity variance is at or below `min_window_var` are
/// skipped; a fully uniform document therefore yields no placement at all.
pub fn scan_best(
    image: ImageView<'_>,
    plan: &TemplatePlan,
    min_window_var: f32,
) -> LogoLocResult<Option<Placement>> {
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Err(LogoLocError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: tpl_width,
            height: tpl_height,
            img_width,
            img_height,
        });
    }

    let area = plan.area();
    let var_t = plan.var_t();
    let zero_mean = plan.zero_mean();

    let mut best: Option<Placement> = None;
    for y in 0..=(img_height - tpl_height) {
        for x in 0..=(img_width - tpl_width) {
            let mut dot = 0.0f32;
            let mut sum_i = 0.0f32;
            let mut sum_i2 = 0.0f32;

            for ty in 0..tpl_height {
                let img_row = image.row(y + ty).expect("row within bounds for scan");
                let base = ty * tpl_width;
                for tx in 0..tpl_width {
                    let value = img_row[x + tx] as f32;
                    dot += zero_mean[base + tx] * value;
                    sum_i += value;
                    sum_i2 += value * value;
                }
            }

            let var_i = sum_i2 - (sum_i * sum_i) / area;
            if var_i <= min_window_var {
                continue;
            }

            let score = dot / (var_t * var_i).sqrt();
            if !score.is_finite() {
                continue;
            }
            let candidate = Placement { x, y, score };
            if best.map_or(true, |b| placement_better(&candidate, &b)) {
                best = Some(candidate);
            }
        }
    }

    Ok(best)
}
