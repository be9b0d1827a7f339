//! Robust planar transform estimation from point correspondences.
//!
//! Provides DLT homography estimation with Hartley normalization, a
//! least-squares affine fit, and a RANSAC consensus wrapper that tolerates
//! the mismatched correspondences feature matching inevitably produces.

use crate::util::{LogoLocError, LogoLocResult};
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Projects a 2D point through a 3x3 transform: `H * [x, y, 1]^T -> [u, v]`.
pub fn project(h: &Matrix3<f64>, p: [f64; 2]) -> [f64; 2] {
    let q = h * Vector3::new(p[0], p[1], 1.0);
    if q[2].abs() < 1e-15 {
        return [f64::NAN, f64::NAN];
    }
    [q[0] / q[2], q[1] / q[2]]
}

/// Euclidean distance between `project(h, src)` and `dst`.
pub fn reprojection_error(h: &Matrix3<f64>, src: [f64; 2], dst: [f64; 2]) -> f64 {
    let p = project(h, src);
    let dx = p[0] - dst[0];
    let dy = p[1] - dst[1];
    (dx * dx + dy * dy).sqrt()
}

/// Translate the centroid to the origin and scale so the mean distance from
/// the origin is sqrt(2) (Hartley normalization).
fn normalize_points(pts: &[[f64; 2]]) -> (Matrix3<f64>, Vec<[f64; 2]>) {
    let n = pts.len() as f64;
    let cx = pts.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = pts.iter().map(|p| p[1]).sum::<f64>() / n;
    let mean_dist = pts
        .iter()
        .map(|p| ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let s = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);
    let normalized = pts.iter().map(|p| [s * (p[0] - cx), s * (p[1] - cy)]).collect();
    (t, normalized)
}

/// Estimates a homography from >= 4 correspondences via DLT.
pub fn estimate_homography(src: &[[f64; 2]], dst: &[[f64; 2]]) -> LogoLocResult<Matrix3<f64>> {
    let n = src.len();
    if n < 4 || dst.len() != n {
        return Err(LogoLocError::TooFewPoints {
            needed: 4,
            got: n.min(dst.len()),
        });
    }

    let (t_src, src_n) = normalize_points(src);
    let (t_dst, dst_n) = normalize_points(dst);

    let mut a = DMatrix::zeros(2 * n, 9);
    for i in 0..n {
        let [sx, sy] = src_n[i];
        let [dx, dy] = dst_n[i];

        a[(2 * i, 3)] = -sx;
        a[(2 * i, 4)] = -sy;
        a[(2 * i, 5)] = -1.0;
        a[(2 * i, 6)] = dy * sx;
        a[(2 * i, 7)] = dy * sy;
        a[(2 * i, 8)] = dy;

        a[(2 * i + 1, 0)] = sx;
        a[(2 * i + 1, 1)] = sy;
        a[(2 * i + 1, 2)] = 1.0;
        a[(2 * i + 1, 6)] = -dx * sx;
        a[(2 * i + 1, 7)] = -dx * sy;
        a[(2 * i + 1, 8)] = -dx;
    }

    // The solution is the eigenvector of A^T A with the smallest eigenvalue.
    let ata = a.transpose() * &a;
    let eig = nalgebra::SymmetricEigen::new(ata);
    let mut min_idx = 0;
    for i in 1..9 {
        if eig.eigenvalues[i].abs() < eig.eigenvalues[min_idx].abs() {
            min_idx = i;
        }
    }
    let v = eig.eigenvectors.column(min_idx);
    let h_norm = Matrix3::new(v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8]);

    let t_dst_inv = t_dst.try_inverse().ok_or(LogoLocError::NumericalFailure {
        reason: "normalization transform not invertible",
    })?;
    let h = t_dst_inv * h_norm * t_src;

    let scale = h[(2, 2)];
    if scale.abs() < 1e-15 {
        Ok(h)
    } else {
        Ok(h / scale)
    }
}

/// Estimates an affine transform from >= 3 correspondences by least squares,
/// returned embedded in a 3x3 matrix with `[0, 0, 1]` as the last row.
pub fn estimate_affine(src: &[[f64; 2]], dst: &[[f64; 2]]) -> LogoLocResult<Matrix3<f64>> {
    let n = src.len();
    if n < 3 || dst.len() != n {
        return Err(LogoLocError::TooFewPoints {
            needed: 3,
            got: n.min(dst.len()),
        });
    }

    let mut a = DMatrix::zeros(n, 3);
    let mut bu = DVector::zeros(n);
    let mut bv = DVector::zeros(n);
    for i in 0..n {
        a[(i, 0)] = src[i][0];
        a[(i, 1)] = src[i][1];
        a[(i, 2)] = 1.0;
        bu[i] = dst[i][0];
        bv[i] = dst[i][1];
    }

    let svd = a.svd(true, true);
    let row_u = svd
        .solve(&bu, 1e-12)
        .map_err(|_| LogoLocError::NumericalFailure {
            reason: "affine least-squares solve failed",
        })?;
    let row_v = svd
        .solve(&bv, 1e-12)
        .map_err(|_| LogoLocError::NumericalFailure {
            reason: "affine least-squares solve failed",
        })?;

    Ok(Matrix3::new(
        row_u[0], row_u[1], row_u[2], row_v[0], row_v[1], row_v[2], 0.0, 0.0, 1.0,
    ))
}

/// Transform family fitted by RANSAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformModel {
    /// Full projective transform; minimal sample of 4.
    Homography,
    /// Affine transform for sparse correspondence sets; minimal sample of 3.
    Affine,
}

impl TransformModel {
    fn minimal_sample(self) -> usize {
        match self {
            TransformModel::Homography => 4,
            TransformModel::Affine => 3,
        }
    }

    fn estimate(self, src: &[[f64; 2]], dst: &[[f64; 2]]) -> LogoLocResult<Matrix3<f64>> {
        match self {
            TransformModel::Homography => estimate_homography(src, dst),
            TransformModel::Affine => estimate_affine(src, dst),
        }
    }
}

/// RANSAC parameters for transform fitting.
#[derive(Debug, Clone, Copy)]
pub struct RansacConfig {
    /// Maximum number of consensus iterations.
    pub max_iters: usize,
    /// Reprojection error (pixels) below which a correspondence is an inlier.
    pub inlier_threshold: f64,
    /// Minimum inlier count for a valid model.
    pub min_inliers: usize,
    /// RNG seed; fixed so identical inputs give identical results.
    pub seed: u64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            max_iters: 2000,
            inlier_threshold: 5.0,
            min_inliers: 4,
            seed: 7,
        }
    }
}

/// Result of a RANSAC transform fit.
#[derive(Debug, Clone)]
pub struct RansacFit {
    /// The fitted transform (affine fits have `[0, 0, 1]` as the last row).
    pub transform: Matrix3<f64>,
    /// Per-correspondence inlier flags under the refit transform.
    pub inlier_mask: Vec<bool>,
    /// Number of inliers.
    pub n_inliers: usize,
}

fn sample_distinct(rng: &mut StdRng, n: usize, k: usize) -> Option<Vec<usize>> {
    debug_assert!(k <= n);
    for _ in 0..100 {
        let candidate: Vec<usize> = (0..k).map(|_| rng.gen_range(0..n)).collect();
        let distinct = candidate
            .iter()
            .enumerate()
            .all(|(i, &v)| candidate[..i].iter().all(|&w| w != v));
        if distinct {
            return Some(candidate);
        }
    }
    None
}

/// Fits a transform with RANSAC, then refits on all inliers.
pub fn fit_transform_ransac(
    src: &[[f64; 2]],
    dst: &[[f64; 2]],
    model: TransformModel,
    cfg: &RansacConfig,
) -> LogoLocResult<RansacFit> {
    let n = src.len();
    let k = model.minimal_sample();
    if n < k || dst.len() != n {
        return Err(LogoLocError::TooFewPoints {
            needed: k,
            got: n.min(dst.len()),
        });
    }

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut best_inliers = 0usize;
    let mut best_mask = vec![false; n];
    let mut best_transform = Matrix3::identity();

    for _ in 0..cfg.max_iters {
        let Some(indices) = sample_distinct(&mut rng, n, k) else {
            continue;
        };
        let s: Vec<[f64; 2]> = indices.iter().map(|&i| src[i]).collect();
        let d: Vec<[f64; 2]> = indices.iter().map(|&i| dst[i]).collect();
        let Ok(h) = model.estimate(&s, &d) else {
            continue;
        };

        let mut count = 0usize;
        let mut mask = vec![false; n];
        for i in 0..n {
            if reprojection_error(&h, src[i], dst[i]) < cfg.inlier_threshold {
                mask[i] = true;
                count += 1;
            }
        }

        if count > best_inliers {
            best_inliers = count;
            best_mask = mask;
            best_transform = h;
            // Consensus is overwhelming; further iterations cannot help much.
            if count * 10 > n * 9 {
                break;
            }
        }
    }

    if best_inliers < cfg.min_inliers.max(k) {
        return Err(LogoLocError::InsufficientInliers {
            needed: cfg.min_inliers.max(k),
            found: best_inliers,
        });
    }

    let inlier_src: Vec<[f64; 2]> = (0..n).filter(|&i| best_mask[i]).map(|i| src[i]).collect();
    let inlier_dst: Vec<[f64; 2]> = (0..n).filter(|&i| best_mask[i]).map(|i| dst[i]).collect();
    let refit = model
        .estimate(&inlier_src, &inlier_dst)
        .unwrap_or(best_transform);

    let mut final_mask = vec![false; n];
    let mut final_inliers = 0usize;
    for i in 0..n {
        if reprojection_error(&refit, src[i], dst[i]) < cfg.inlier_threshold {
            final_mask[i] = true;
            final_inliers += 1;
        }
    }

    Ok(RansacFit {
        transform: refit,
        inlier_mask: final_mask,
        n_inliers: final_inliers,
    })
}
