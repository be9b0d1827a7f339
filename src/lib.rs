//! logoloc locates a known logo inside a larger scanned document image and
//! derives a secondary "section" region relative to the logo's position.
//!
//! Two matching strategies are provided: a keypoint/descriptor matcher with
//! robust transform fitting, and a multi-scale normalized cross-correlation
//! sweep. The [`Locator`] arbitrates between them with configurable
//! acceptance thresholds. Section geometry converts profile multipliers into
//! absolute pixel rectangles clamped to the image extent.

pub mod feature;
pub mod geometry;
pub mod image;
pub mod locate;
pub mod profile;
pub mod template;
pub mod util;

pub use feature::{locate_by_features, FeatureConfig, RansacConfig};
pub use geometry::{compute_section, BoundingBox, SectionSpec};
pub use image::pyramid::ImagePyramid;
pub use image::{ImageView, OwnedImage};
pub use locate::{Detection, Locator, LocatorConfig, MatchMethod, Method};
pub use profile::{Profile, ProfileStore};
pub use template::{locate_by_template, TemplateConfig};
pub use util::{LogoLocError, LogoLocResult};

#[cfg(feature = "image-io")]
pub use image::io;
