//! Oriented binary descriptors for detected corners.
//!
//! Each descriptor is 256 brightness comparisons between point pairs drawn
//! once from a seeded uniform distribution, rotated (steered) by the
//! keypoint's intensity-centroid orientation so the fingerprint is
//! comparable across in-plane rotation.

use crate::ImageView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 256-bit binary descriptor, packed as 32 bytes.
pub type Descriptor = [u8; 32];

/// Number of point-pair comparisons per descriptor.
const PATTERN_SIZE: usize = 256;

/// Half-side of the square the pattern is drawn from.
const PATTERN_RADIUS: i32 = 13;

/// Radius of the circular patch used for orientation.
const ORIENTATION_RADIUS: i32 = 15;

/// Fixed seed: the pattern is part of the descriptor definition, so it must
/// be identical across processes for descriptors to be comparable.
const PATTERN_SEED: u64 = 0x5eed_cafe;

/// Border margin keypoints must keep so rotated samples stay in bounds.
/// `ceil(13 * sqrt(2)) = 19`, which also covers the orientation patch.
pub const PATCH_MARGIN: usize = 19;

/// Sampling pattern shared by all descriptors.
pub struct DescriptorPattern {
    pairs: Vec<((i32, i32), (i32, i32))>,
}

impl DescriptorPattern {
    /// Generates the canonical pattern. Deterministic.
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
        let mut pairs = Vec::with_capacity(PATTERN_SIZE);
        for _ in 0..PATTERN_SIZE {
            let a = (
                rng.gen_range(-PATTERN_RADIUS..=PATTERN_RADIUS),
                rng.gen_range(-PATTERN_RADIUS..=PATTERN_RADIUS),
            );
            let b = (
                rng.gen_range(-PATTERN_RADIUS..=PATTERN_RADIUS),
                rng.gen_range(-PATTERN_RADIUS..=PATTERN_RADIUS),
            );
            pairs.push((a, b));
        }
        Self { pairs }
    }
}

impl Default for DescriptorPattern {
    fn default() -> Self {
        Self::new()
    }
}

/// Intensity-centroid orientation of the patch around `(x, y)`, in radians.
pub fn orientation(image: ImageView<'_>, x: usize, y: usize) -> f32 {
    let mut m10 = 0.0f32;
    let mut m01 = 0.0f32;
    let r = ORIENTATION_RADIUS;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let Some(value) = image.get_signed(x as isize + dx as isize, y as isize + dy as isize)
            else {
                continue;
            };
            let v = value as f32;
            m10 += dx as f32 * v;
            m01 += dy as f32 * v;
        }
    }
    m01.atan2(m10)
}

/// Computes the steered descriptor for a keypoint at `(x, y)` with the given
/// orientation. Returns `None` if any rotated sample falls outside the image.
pub fn describe(
    image: ImageView<'_>,
    x: usize,
    y: usize,
    angle: f32,
    pattern: &DescriptorPattern,
) -> Option<Descriptor> {
    let (sin, cos) = angle.sin_cos();
    let sample = |p: (i32, i32)| -> Option<u8> {
        let rx = cos * p.0 as f32 - sin * p.1 as f32;
        let ry = sin * p.0 as f32 + cos * p.1 as f32;
        image.get_signed(
            x as isize + rx.round() as isize,
            y as isize + ry.round() as isize,
        )
    };

    let mut descriptor = [0u8; 32];
    for (i, &(a, b)) in pattern.pairs.iter().enumerate() {
        if sample(a)? < sample(b)? {
            descriptor[i / 8] |= 1 << (i % 8);
        }
    }
    Some(descriptor)
}
