//! Multi-scale template matcher.
//!
//! Slides a normalized cross-correlation window over the document at a fixed
//! sweep of template scales and keeps the single best placement across the
//! whole sweep. Robust when the document has too few distinguishable
//! keypoints for feature matching, at the cost of rotation sensitivity and a
//! per-scale cost proportional to the document area.

use crate::geometry::BoundingBox;
use crate::image::resize::resize_bilinear;
use crate::locate::{Detection, MatchMethod};
use crate::util::trace::{trace_event, trace_span};
use crate::util::{LogoLocError, LogoLocResult};
use crate::ImageView;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub mod plan;
pub mod scan;

pub use plan::TemplatePlan;
pub use scan::{scan_best, Placement};

/// Configuration of the template matcher's scale sweep.
///
/// The sweep cost is `scale_steps x document_area`; callers needing latency
/// bounds should reduce the step count or the scale range.
#[derive(Debug, Clone, Copy)]
pub struct TemplateConfig {
    /// Smallest template scale factor in the sweep.
    pub min_scale: f64,
    /// Largest template scale factor in the sweep.
    pub max_scale: f64,
    /// Number of evenly spaced scales between `min_scale` and `max_scale`.
    pub scale_steps: usize,
    /// Scaled templates below this side length are skipped.
    pub min_side: usize,
    /// Document windows with variance at or below this floor are skipped.
    pub min_window_var: f32,
    /// Evaluate scales in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 1.5,
            scale_steps: 11,
            min_side: 8,
            min_window_var: 1e-6,
            parallel: false,
        }
    }
}

impl TemplateConfig {
    /// Returns the evenly spaced scale factors of the sweep.
    pub fn scale_factors(&self) -> Vec<f64> {
        if self.scale_steps <= 1 {
            return vec![self.min_scale];
        }
        let step = (self.max_scale - self.min_scale) / (self.scale_steps - 1) as f64;
        (0..self.scale_steps)
            .map(|i| self.min_scale + step * i as f64)
            .collect()
    }
}

/// Best placement found at one scale of the sweep.
#[derive(Debug, Clone, Copy)]
struct ScaledPlacement {
    placement: Placement,
    width: usize,
    height: usize,
}

fn evaluate_scale(
    document: ImageView<'_>,
    template: ImageView<'_>,
    scale: f64,
    cfg: &TemplateConfig,
) -> LogoLocResult<Option<ScaledPlacement>> {
    let width = (template.width() as f64 * scale).round() as usize;
    let height = (template.height() as f64 * scale).round() as usize;
    if width < cfg.min_side || height < cfg.min_side {
        return Ok(None);
    }
    if width > document.width() || height > document.height() {
        return Ok(None);
    }

    let scaled = resize_bilinear(template, width, height)?;
    let plan = match TemplatePlan::from_view(scaled.view()) {
        Ok(plan) => plan,
        // A flat template stays flat at every scale; skip rather than fail.
        Err(LogoLocError::DegenerateTemplate { .. }) => return Ok(None),
        Err(err) => return Err(err),
    };

    let best = scan_best(document, &plan, cfg.min_window_var)?;
    Ok(best.map(|placement| ScaledPlacement {
        placement,
        width,
        height,
    }))
}

fn better(candidate: &ScaledPlacement, incumbent: &ScaledPlacement) -> bool {
    scan::placement_better(&candidate.placement, &incumbent.placement)
}

#[cfg(feature = "rayon")]
fn sweep_parallel(
    document: ImageView<'_>,
    template: ImageView<'_>,
    scales: &[f64],
    cfg: &TemplateConfig,
) -> LogoLocResult<Option<ScaledPlacement>> {
    let results: Vec<_> = scales
        .par_iter()
        .map(|&scale| evaluate_scale(document, template, scale, cfg))
        .collect();

    let mut best: Option<ScaledPlacement> = None;
    for result in results {
        if let Some(candidate) = result? {
            if best.as_ref().map_or(true, |b| better(&candidate, b)) {
                best = Some(candidate);
            }
        }
    }
    Ok(best)
}

fn sweep_serial(
    document: ImageView<'_>,
    template: ImageView<'_>,
    scales: &[f64],
    cfg: &TemplateConfig,
) -> LogoLocResult<Option<ScaledPlacement>> {
    let mut best: Option<ScaledPlacement> = None;
    for &scale in scales {
        if let Some(candidate) = evaluate_scale(document, template, scale, cfg)? {
            if best.as_ref().map_or(true, |b| better(&candidate, b)) {
                best = Some(candidate);
            }
        }
    }
    Ok(best)
}

/// Locates the template in the document via the multi-scale correlation sweep.
///
/// Returns `Ok(None)` when no scaled template fits inside the document or
/// every window was variance-degenerate. The matcher applies no acceptance
/// threshold; that policy belongs to the locator.
pub fn locate_by_template(
    document: ImageView<'_>,
    template: ImageView<'_>,
    cfg: &TemplateConfig,
) -> LogoLocResult<Option<Detection>> {
    let scales = cfg.scale_factors();
    let _span = trace_span!("template_sweep", scales = scales.len()).entered();

    #[cfg(feature = "rayon")]
    let best = if cfg.parallel {
        sweep_parallel(document, template, &scales, cfg)?
    } else {
        sweep_serial(document, template, &scales, cfg)?
    };
    #[cfg(not(feature = "rayon"))]
    let best = sweep_serial(document, template, &scales, cfg)?;

    let Some(found) = best else {
        trace_event!("template_sweep_empty");
        return Ok(None);
    };

    let bbox = BoundingBox::from_edges_clamped(
        found.placement.x as f64,
        found.placement.y as f64,
        (found.placement.x + found.width) as f64,
        (found.placement.y + found.height) as f64,
        document.width() as u32,
        document.height() as u32,
    );
    let Some(bbox) = bbox else {
        return Ok(None);
    };

    trace_event!(
        "template_best",
        score = found.placement.score,
        x = found.placement.x,
        y = found.placement.y,
    );
    Ok(Some(Detection {
        bbox,
        confidence: found.placement.score.clamp(0.0, 1.0),
        method: MatchMethod::Template,
        polygon: None,
    }))
}
