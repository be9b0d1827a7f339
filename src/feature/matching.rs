//! Brute-force Hamming matching with a distance-ratio test.

use crate::feature::descriptor::Descriptor;

/// Accepted correspondence between a query and a train descriptor.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorMatch {
    /// Index into the query (template) descriptor set.
    pub query: usize,
    /// Index into the train (document) descriptor set.
    pub train: usize,
    /// Hamming distance of the accepted pair.
    pub distance: u32,
}

/// Hamming distance between two packed 256-bit descriptors.
pub fn hamming(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x ^ y).count_ones())
        .sum()
}

/// Matches each query descriptor to its nearest train descriptor, accepting
/// the pair only if the best distance is meaningfully closer than the
/// second-best (`best < ratio * second_best`). This is the standard filter
/// against ambiguous matches; it requires at least two train descriptors.
pub fn match_ratio(
    query: &[Descriptor],
    train: &[Descriptor],
    ratio: f32,
) -> Vec<DescriptorMatch> {
    if train.len() < 2 {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for (qi, q) in query.iter().enumerate() {
        let mut best = u32::MAX;
        let mut second = u32::MAX;
        let mut best_idx = 0usize;
        for (ti, t) in train.iter().enumerate() {
            let d = hamming(q, t);
            if d < best {
                second = best;
                best = d;
                best_idx = ti;
            } else if d < second {
                second = d;
            }
        }
        if (best as f32) < ratio * second as f32 {
            matches.push(DescriptorMatch {
                query: qi,
                train: best_idx,
                distance: best,
            });
        }
    }
    matches
}
