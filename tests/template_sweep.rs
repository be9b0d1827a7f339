use logoloc::image::resize::resize_by_factor;
use logoloc::{locate_by_template, ImageView, MatchMethod, OwnedImage, TemplateConfig};

/// Deterministic noise patch; textured enough that correlation peaks sharply
/// at the true placement.
fn noise_image(width: usize, height: usize, seed: u64) -> OwnedImage {
    let mut state = seed;
    let data: Vec<u8> = (0..width * height)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect();
    OwnedImage::new(data, width, height).unwrap()
}

/// Document with a uniform background and one pasted patch.
fn document_with_patch(
    width: usize,
    height: usize,
    background: u8,
    patch: &OwnedImage,
    x: usize,
    y: usize,
) -> OwnedImage {
    let mut data = vec![background; width * height];
    for row in 0..patch.height() {
        for col in 0..patch.width() {
            data[(y + row) * width + (x + col)] = patch.data()[row * patch.width() + col];
        }
    }
    OwnedImage::new(data, width, height).unwrap()
}

fn sweep_config() -> TemplateConfig {
    TemplateConfig {
        scale_steps: 5,
        ..TemplateConfig::default()
    }
}

#[test]
fn scale_factors_are_evenly_spaced() {
    let cfg = sweep_config();
    assert_eq!(cfg.scale_factors(), vec![0.5, 0.75, 1.0, 1.25, 1.5]);

    let single = TemplateConfig {
        scale_steps: 1,
        ..TemplateConfig::default()
    };
    assert_eq!(single.scale_factors(), vec![0.5]);
}

#[test]
fn finds_exact_embed_at_unit_scale() {
    let template = noise_image(24, 18, 7);
    let document = document_with_patch(140, 110, 64, &template, 37, 52);

    let detection = locate_by_template(document.view(), template.view(), &sweep_config())
        .unwrap()
        .expect("embedded template must be found");

    assert_eq!(detection.method, MatchMethod::Template);
    assert_eq!(detection.bbox.x, 37);
    assert_eq!(detection.bbox.y, 52);
    assert_eq!(detection.bbox.width, 24);
    assert_eq!(detection.bbox.height, 18);
    assert!(
        detection.confidence > 0.99,
        "exact embed should correlate near 1.0, got {}",
        detection.confidence
    );
    assert!(detection.polygon.is_none());
}

#[test]
fn finds_half_scale_embed_with_scaled_dimensions() {
    let template = noise_image(24, 18, 11);
    let half = resize_by_factor(template.view(), 0.5).unwrap();
    assert_eq!((half.width(), half.height()), (12, 9));
    let document = document_with_patch(140, 110, 64, &half, 90, 20);

    let detection = locate_by_template(document.view(), template.view(), &sweep_config())
        .unwrap()
        .expect("half-scale embed must be found");

    // The 0.5 sweep step reproduces the pasted patch exactly.
    assert_eq!(detection.bbox.x, 90);
    assert_eq!(detection.bbox.y, 20);
    assert_eq!(detection.bbox.width, 12);
    assert_eq!(detection.bbox.height, 9);
    assert!(detection.confidence > 0.99);
}

#[test]
fn document_smaller_than_every_scale_yields_not_found() {
    let template = noise_image(24, 18, 3);
    let document = noise_image(10, 8, 4);

    let result = locate_by_template(document.view(), template.view(), &sweep_config()).unwrap();
    assert!(result.is_none());
}

#[test]
fn flat_document_yields_not_found() {
    let template = noise_image(24, 18, 5);
    let document = OwnedImage::new(vec![128; 140 * 110], 140, 110).unwrap();

    // Every window is variance-degenerate; the sweep must not divide by a
    // zero denominator or report a spurious placement.
    let result = locate_by_template(document.view(), template.view(), &sweep_config()).unwrap();
    assert!(result.is_none());
}

#[test]
fn flat_template_yields_not_found() {
    let template = OwnedImage::new(vec![200; 24 * 18], 24, 18).unwrap();
    let document = noise_image(140, 110, 9);

    let result = locate_by_template(document.view(), template.view(), &sweep_config()).unwrap();
    assert!(result.is_none());
}

#[test]
fn strided_document_view_matches_contiguous_result() {
    let template = noise_image(16, 16, 13);
    let document = document_with_patch(96, 72, 32, &template, 40, 24);

    // Same pixels exposed once contiguously and once through a wider buffer.
    let mut padded = vec![0u8; 120 * 72];
    for y in 0..72 {
        padded[y * 120..y * 120 + 96].copy_from_slice(&document.data()[y * 96..(y + 1) * 96]);
    }
    let strided = ImageView::new(&padded, 96, 72, 120).unwrap();

    let cfg = sweep_config();
    let from_owned = locate_by_template(document.view(), template.view(), &cfg).unwrap();
    let from_strided = locate_by_template(strided, template.view(), &cfg).unwrap();
    assert_eq!(from_owned, from_strided);
    assert!(from_owned.is_some());
}
