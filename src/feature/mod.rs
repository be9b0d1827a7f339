//! Feature-based logo matcher.
//!
//! Detects corners over an image pyramid, describes them with oriented
//! binary descriptors, matches template descriptors against the document
//! with a distance-ratio test, and fits a robust planar transform to the
//! surviving correspondences. The transform maps the template's corners into
//! the document, giving the true (possibly non-rectangular) quadrilateral.

use crate::geometry::BoundingBox;
use crate::image::pyramid::ImagePyramid;
use crate::locate::{Detection, MatchMethod};
use crate::util::trace::{trace_event, trace_span};
use crate::util::{LogoLocError, LogoLocResult};
use crate::ImageView;

pub mod descriptor;
pub mod fast;
pub mod homography;
pub mod matching;

pub use descriptor::{Descriptor, DescriptorPattern};
pub use homography::{RansacConfig, RansacFit, TransformModel};
pub use matching::DescriptorMatch;

/// Configuration of the feature matcher.
#[derive(Debug, Clone, Copy)]
pub struct FeatureConfig {
    /// FAST segment-test intensity threshold.
    pub fast_threshold: u8,
    /// Keypoints kept per image after sorting by corner score.
    pub max_keypoints: usize,
    /// Pyramid levels used for multi-scale detection.
    pub pyramid_levels: usize,
    /// Lowe ratio: accept a match only if `best < ratio * second_best`.
    pub ratio: f32,
    /// Minimum accepted correspondences to attempt a fit (floored at 4).
    pub min_matches: usize,
    /// Below this correspondence count, fit an affine model instead of a
    /// full homography.
    pub homography_min_matches: usize,
    /// Robust estimator parameters.
    pub ransac: RansacConfig,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            fast_threshold: 20,
            max_keypoints: 2000,
            pyramid_levels: 4,
            ratio: 0.75,
            min_matches: 10,
            homography_min_matches: 8,
            ransac: RansacConfig::default(),
        }
    }
}

/// Keypoint in base-image coordinates with its descriptor.
struct Feature {
    point: [f64; 2],
    descriptor: Descriptor,
}

/// Detects and describes keypoints across the pyramid, strongest first.
fn extract_features(
    image: ImageView<'_>,
    cfg: &FeatureConfig,
    pattern: &DescriptorPattern,
) -> LogoLocResult<Vec<Feature>> {
    let pyramid = ImagePyramid::build(image, cfg.pyramid_levels)?;

    let mut corners = Vec::new();
    for level in 0..pyramid.num_levels() {
        let view = pyramid.level(level).expect("level index within pyramid");
        for corner in fast::detect_corners(view, cfg.fast_threshold, descriptor::PATCH_MARGIN) {
            corners.push((level, corner));
        }
    }
    corners.sort_by(|a, b| {
        b.1.score
            .total_cmp(&a.1.score)
            .then_with(|| (a.0, a.1.y, a.1.x).cmp(&(b.0, b.1.y, b.1.x)))
    });
    corners.truncate(cfg.max_keypoints);

    let mut features = Vec::with_capacity(corners.len());
    for (level, corner) in corners {
        let view = pyramid.level(level).expect("level index within pyramid");
        let angle = descriptor::orientation(view, corner.x, corner.y);
        let Some(desc) = descriptor::describe(view, corner.x, corner.y, angle, pattern) else {
            continue;
        };
        let scale = pyramid.scale_to_base(level);
        features.push(Feature {
            point: [corner.x as f64 * scale, corner.y as f64 * scale],
            descriptor: desc,
        });
    }
    Ok(features)
}

/// Locates the template in the document via keypoint correspondences.
///
/// `confidence` is the inlier ratio of the fitted transform. Returns
/// `Ok(None)` when either image has too few keypoints, too few
/// correspondences survive the ratio test, or transform estimation fails on
/// a degenerate configuration.
pub fn locate_by_features(
    document: ImageView<'_>,
    template: ImageView<'_>,
    cfg: &FeatureConfig,
) -> LogoLocResult<Option<Detection>> {
    let _span = trace_span!(
        "feature_match",
        doc_w = document.width(),
        doc_h = document.height()
    )
    .entered();

    let pattern = DescriptorPattern::new();
    let tpl_features = extract_features(template, cfg, &pattern)?;
    let doc_features = extract_features(document, cfg, &pattern)?;
    trace_event!(
        "keypoints",
        template = tpl_features.len(),
        document = doc_features.len(),
    );

    let needed = cfg.min_matches.max(4);
    if tpl_features.len() < needed || doc_features.len() < needed {
        return Ok(None);
    }

    let tpl_desc: Vec<Descriptor> = tpl_features.iter().map(|f| f.descriptor).collect();
    let doc_desc: Vec<Descriptor> = doc_features.iter().map(|f| f.descriptor).collect();
    let matches = matching::match_ratio(&tpl_desc, &doc_desc, cfg.ratio);
    trace_event!("ratio_matches", count = matches.len());
    if matches.len() < needed {
        return Ok(None);
    }

    let src: Vec<[f64; 2]> = matches.iter().map(|m| tpl_features[m.query].point).collect();
    let dst: Vec<[f64; 2]> = matches.iter().map(|m| doc_features[m.train].point).collect();

    let model = if matches.len() < cfg.homography_min_matches {
        TransformModel::Affine
    } else {
        TransformModel::Homography
    };
    let fit = match homography::fit_transform_ransac(&src, &dst, model, &cfg.ransac) {
        Ok(fit) => fit,
        // A degenerate point configuration is a not-found outcome, not an
        // input error.
        Err(
            LogoLocError::TooFewPoints { .. }
            | LogoLocError::InsufficientInliers { .. }
            | LogoLocError::NumericalFailure { .. },
        ) => return Ok(None),
        Err(err) => return Err(err),
    };

    let w = template.width() as f64;
    let h = template.height() as f64;
    let corners = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];
    let mut polygon = [[0.0f64; 2]; 4];
    for (out, corner) in polygon.iter_mut().zip(corners.iter()) {
        let p = homography::project(&fit.transform, *corner);
        if !p[0].is_finite() || !p[1].is_finite() {
            return Ok(None);
        }
        *out = p;
    }

    let xs = polygon.iter().map(|p| p[0]);
    let ys = polygon.iter().map(|p| p[1]);
    let bbox = BoundingBox::from_edges_clamped(
        xs.clone().fold(f64::INFINITY, f64::min),
        ys.clone().fold(f64::INFINITY, f64::min),
        xs.fold(f64::NEG_INFINITY, f64::max),
        ys.fold(f64::NEG_INFINITY, f64::max),
        document.width() as u32,
        document.height() as u32,
    );
    let Some(bbox) = bbox else {
        // Projected quadrilateral lies entirely outside the document.
        return Ok(None);
    };

    let confidence = (fit.n_inliers as f32 / matches.len() as f32).clamp(0.0, 1.0);
    trace_event!(
        "feature_fit",
        inliers = fit.n_inliers,
        matches = matches.len(),
    );
    Ok(Some(Detection {
        bbox,
        confidence,
        method: MatchMethod::Orb,
        polygon: Some(polygon),
    }))
}
