use logoloc::feature::homography::{
    estimate_affine, estimate_homography, fit_transform_ransac, project, reprojection_error,
    RansacConfig, TransformModel,
};
use logoloc::LogoLocError;
use nalgebra::Matrix3;

/// Small deterministic generator so tests need no RNG dependency.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn test_homography() -> Matrix3<f64> {
    // Scale + translate + mild perspective.
    Matrix3::new(3.5, 0.1, 640.0, -0.05, 3.3, 480.0, 0.0001, -0.00005, 1.0)
}

#[test]
fn dlt_recovers_exact_four_point_mapping() {
    let h_true = test_homography();
    let src = [[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]];
    let dst: Vec<[f64; 2]> = src.iter().map(|&s| project(&h_true, s)).collect();

    let h_est = estimate_homography(&src, &dst).unwrap();
    for (&s, &d) in src.iter().zip(&dst) {
        let err = reprojection_error(&h_est, s, d);
        assert!(err < 1e-6, "reprojection error too large: {err}");
    }
}

#[test]
fn dlt_handles_overdetermined_grids() {
    let h_true = test_homography();
    let mut src = Vec::new();
    let mut dst = Vec::new();
    for i in 0..5 {
        for j in 0..5 {
            let s = [i as f64 * 20.0, j as f64 * 20.0];
            src.push(s);
            dst.push(project(&h_true, s));
        }
    }

    let h_est = estimate_homography(&src, &dst).unwrap();
    for (&s, &d) in src.iter().zip(&dst) {
        let err = reprojection_error(&h_est, s, d);
        assert!(err < 1e-6, "reprojection error: {err}");
    }
}

#[test]
fn ransac_survives_outlier_contamination() {
    let h_true = test_homography();
    let mut lcg = Lcg(42);

    let mut src = Vec::new();
    let mut dst = Vec::new();
    for i in 0..20 {
        let s = [(i % 5) as f64 * 30.0, (i / 5) as f64 * 30.0];
        let d = project(&h_true, s);
        src.push(s);
        dst.push([d[0] + lcg.range(-0.5, 0.5), d[1] + lcg.range(-0.5, 0.5)]);
    }
    for _ in 0..8 {
        src.push([lcg.range(0.0, 100.0), lcg.range(0.0, 100.0)]);
        dst.push([lcg.range(0.0, 1280.0), lcg.range(0.0, 960.0)]);
    }

    let cfg = RansacConfig {
        max_iters: 2000,
        inlier_threshold: 3.0,
        min_inliers: 6,
        seed: 99,
    };
    let fit = fit_transform_ransac(&src, &dst, TransformModel::Homography, &cfg).unwrap();

    assert!(fit.n_inliers >= 18, "only {} inliers", fit.n_inliers);
    for i in 0..20 {
        let err = reprojection_error(&fit.transform, src[i], dst[i]);
        assert!(err < 5.0, "inlier {i} has error {err}");
    }
}

#[test]
fn affine_fit_recovers_rotation_scale_translation() {
    // 30 degree rotation, 1.5x scale, translation (40, -10).
    let (sin, cos) = 30f64.to_radians().sin_cos();
    let a_true = Matrix3::new(
        1.5 * cos,
        -1.5 * sin,
        40.0,
        1.5 * sin,
        1.5 * cos,
        -10.0,
        0.0,
        0.0,
        1.0,
    );

    let src = [[0.0, 0.0], [50.0, 0.0], [50.0, 30.0], [0.0, 30.0], [25.0, 15.0]];
    let dst: Vec<[f64; 2]> = src.iter().map(|&s| project(&a_true, s)).collect();

    let a_est = estimate_affine(&src, &dst).unwrap();
    for (&s, &d) in src.iter().zip(&dst) {
        let err = reprojection_error(&a_est, s, d);
        assert!(err < 1e-8, "affine reprojection error: {err}");
    }
    // Last row stays affine.
    assert_eq!(a_est[(2, 0)], 0.0);
    assert_eq!(a_est[(2, 1)], 0.0);
    assert_eq!(a_est[(2, 2)], 1.0);
}

#[test]
fn ransac_with_affine_model_uses_three_point_samples() {
    let a_true = Matrix3::new(2.0, 0.0, 10.0, 0.0, 2.0, 20.0, 0.0, 0.0, 1.0);
    let src = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0], [5.0, 5.0]];
    let dst: Vec<[f64; 2]> = src.iter().map(|&s| project(&a_true, s)).collect();

    let fit = fit_transform_ransac(
        &src,
        &dst,
        TransformModel::Affine,
        &RansacConfig {
            min_inliers: 3,
            ..RansacConfig::default()
        },
    )
    .unwrap();
    assert_eq!(fit.n_inliers, 5);
}

#[test]
fn too_few_points_is_reported() {
    let pts = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
    assert_eq!(
        estimate_homography(&pts, &pts).unwrap_err(),
        LogoLocError::TooFewPoints { needed: 4, got: 3 }
    );

    let two = [[0.0, 0.0], [1.0, 0.0]];
    assert_eq!(
        estimate_affine(&two, &two).unwrap_err(),
        LogoLocError::TooFewPoints { needed: 3, got: 2 }
    );
}
