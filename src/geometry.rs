//! Bounding boxes and logo-relative section geometry.
//!
//! Section rectangles are defined in multiples of the detected logo's own
//! width and height, which keeps profiles scale-invariant with the logo
//! instead of tied to absolute pixels. All derived rectangles are clamped to
//! the image extent; a rectangle whose clamped area collapses to zero is
//! degenerate and reported as `None` rather than an error.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with a top-left origin and positive area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Creates a box from position and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Builds a box from floating-point edges, clamped to the image extent.
    ///
    /// Edges are swapped first if inverted, then rounded and clamped to
    /// `[0, image_width] x [0, image_height]`. Returns `None` when the
    /// clamped width or height is not positive (degenerate).
    pub fn from_edges_clamped(
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let (left, right) = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        let (top, bottom) = if top <= bottom {
            (top, bottom)
        } else {
            (bottom, top)
        };

        let l = (left.round() as i64).clamp(0, i64::from(image_width));
        let r = (right.round() as i64).clamp(0, i64::from(image_width));
        let t = (top.round() as i64).clamp(0, i64::from(image_height));
        let b = (bottom.round() as i64).clamp(0, i64::from(image_height));

        if r <= l || b <= t {
            return None;
        }
        Some(Self {
            x: l as u32,
            y: t as u32,
            width: (r - l) as u32,
            height: (b - t) as u32,
        })
    }
}

/// Section multipliers, tagged by mode.
///
/// Edge mode places all four section edges independently; size mode places
/// the top-left corner and derives the far edges from width/height
/// multipliers. The `mode` tag in serialized form selects the variant, so a
/// payload mixing fields of both modes fails at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SectionSpec {
    /// Absolute edges relative to the logo origin:
    /// `left = logo.x + left_mul * lw`, `right = logo.x + right_mul * lw`,
    /// and analogously for top/bottom with the logo height.
    Edge {
        left_mul: f64,
        top_mul: f64,
        right_mul: f64,
        bottom_mul: f64,
    },
    /// Top-left corner plus direct size:
    /// `left = logo.x + left_mul * lw`, `width = width_mul * lw`,
    /// and analogously for top/height.
    Size {
        left_mul: f64,
        top_mul: f64,
        width_mul: f64,
        height_mul: f64,
    },
}

/// Computes the absolute section rectangle for a detected logo.
///
/// Never mutates `logo`; the result is an independent derived rectangle,
/// clamped to `image_width x image_height`. Returns `None` when clamping
/// removes all area (degenerate section).
pub fn compute_section(
    logo: BoundingBox,
    image_width: u32,
    image_height: u32,
    spec: &SectionSpec,
) -> Option<BoundingBox> {
    let x = f64::from(logo.x);
    let y = f64::from(logo.y);
    let lw = f64::from(logo.width);
    let lh = f64::from(logo.height);

    let (left, top, right, bottom) = match *spec {
        SectionSpec::Edge {
            left_mul,
            top_mul,
            right_mul,
            bottom_mul,
        } => (
            x + left_mul * lw,
            y + top_mul * lh,
            x + right_mul * lw,
            y + bottom_mul * lh,
        ),
        SectionSpec::Size {
            left_mul,
            top_mul,
            width_mul,
            height_mul,
        } => {
            let left = x + left_mul * lw;
            let top = y + top_mul * lh;
            (left, top, left + width_mul * lw, top + height_mul * lh)
        }
    };

    BoundingBox::from_edges_clamped(left, top, right, bottom, image_width, image_height)
}
