#![cfg(feature = "rayon")]

use logoloc::{locate_by_template, OwnedImage, TemplateConfig};

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

#[test]
fn parallel_sweep_matches_serial() {
    let template = noise_image(24, 18, 7);
    let document = document_with_patch(140, 110, 64, &template, 37, 52);

    let serial_cfg = TemplateConfig {
        scale_steps: 5,
        parallel: false,
        ..TemplateConfig::default()
    };
    let parallel_cfg = TemplateConfig {
        parallel: true,
        ..serial_cfg
    };

    let serial = locate_by_template(document.view(), template.view(), &serial_cfg).unwrap();
    let parallel = locate_by_template(document.view(), template.view(), &parallel_cfg).unwrap();

    assert_eq!(serial, parallel);
    let detection = serial.expect("embedded template must be found");
    assert_eq!(detection.bbox.x, 37);
    assert_eq!(detection.bbox.y, 52);
}

#[test]
fn parallel_sweep_matches_serial_on_not_found() {
    let template = noise_image(24, 18, 5);
    let document = OwnedImage::new(vec![128; 140 * 110], 140, 110).unwrap();

    let parallel_cfg = TemplateConfig {
        scale_steps: 5,
        parallel: true,
        ..TemplateConfig::default()
    };
    let result = locate_by_template(document.view(), template.view(), &parallel_cfg).unwrap();
    assert!(result.is_none());
}
