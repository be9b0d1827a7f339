//! Locator orchestration: method policy, fallback order, and acceptance
//! thresholds.

use crate::feature::{locate_by_features, FeatureConfig};
use crate::geometry::BoundingBox;
use crate::template::{locate_by_template, TemplateConfig};
use crate::util::trace::{trace_event, trace_span};
use crate::util::LogoLocResult;
use crate::ImageView;
use serde::{Deserialize, Serialize};

/// Requested matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Feature matcher first, template matcher as fallback.
    Auto,
    /// Feature matcher only.
    Orb,
    /// Template matcher only.
    Template,
}

/// Strategy that actually produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Orb,
    Template,
}

/// Normalized detection result.
///
/// `polygon` is present only for feature matches: the template's corners
/// projected through the fitted transform, which may be non-rectangular;
/// `bbox` is always its axis-aligned envelope clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// In `[0, 1]`: inlier ratio for feature matches, best correlation score
    /// for template matches.
    pub confidence: f32,
    pub method: MatchMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<[[f64; 2]; 4]>,
}

/// Locator policy configuration.
///
/// The acceptance thresholds govern only `Method::Auto` arbitration; the
/// explicit methods return their matcher's outcome unmodified.
#[derive(Debug, Clone, Copy)]
pub struct LocatorConfig {
    pub feature: FeatureConfig,
    pub template: TemplateConfig,
    /// Minimum inlier ratio for accepting a feature match in auto mode.
    pub min_feature_confidence: f32,
    /// Minimum correlation score for accepting a template match in auto mode.
    pub min_template_confidence: f32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            feature: FeatureConfig::default(),
            template: TemplateConfig::default(),
            min_feature_confidence: 0.3,
            min_template_confidence: 0.4,
        }
    }
}

/// Stateless logo locator; safe to share across threads and call
/// concurrently on unrelated image pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Locator {
    cfg: LocatorConfig,
}

impl Locator {
    /// Creates a locator with the given policy configuration.
    pub fn new(cfg: LocatorConfig) -> Self {
        Self { cfg }
    }

    /// Returns the policy configuration.
    pub fn config(&self) -> &LocatorConfig {
        &self.cfg
    }

    /// Locates the template in the document using the requested method.
    ///
    /// `Ok(None)` means no detection met the policy: a first-class outcome,
    /// never coerced into a zero-confidence box. Deterministic given
    /// identical image content and method.
    pub fn locate(
        &self,
        document: ImageView<'_>,
        template: ImageView<'_>,
        method: Method,
    ) -> LogoLocResult<Option<Detection>> {
        let _span = trace_span!("locate").entered();
        match method {
            Method::Orb => locate_by_features(document, template, &self.cfg.feature),
            Method::Template => locate_by_template(document, template, &self.cfg.template),
            Method::Auto => {
                if let Some(detection) = locate_by_features(document, template, &self.cfg.feature)?
                {
                    if detection.confidence >= self.cfg.min_feature_confidence {
                        return Ok(Some(detection));
                    }
                    trace_event!("feature_rejected", confidence = detection.confidence);
                }
                // Feature matching degrades to NotFound on low-texture
                // inputs; the correlation sweep recovers those cases.
                let fallback = locate_by_template(document, template, &self.cfg.template)?;
                match fallback {
                    Some(detection)
                        if detection.confidence >= self.cfg.min_template_confidence =>
                    {
                        Ok(Some(detection))
                    }
                    Some(detection) => {
                        trace_event!("template_rejected", confidence = detection.confidence);
                        Ok(None)
                    }
                    None => Ok(None),
                }
            }
        }
    }
}
