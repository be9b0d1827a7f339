//! FAST-9 corner detection with scored non-maximum suppression.

use crate::ImageView;

/// Bresenham circle of radius 3 used by the FAST segment test.
const RING: [(i32, i32); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

/// Number of contiguous ring pixels required (FAST-9).
const MIN_CONSECUTIVE: usize = 9;

/// Detected corner in level coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Corner {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

fn ring_values(image: ImageView<'_>, x: usize, y: usize) -> [i16; 16] {
    let mut values = [0i16; 16];
    for (i, &(dx, dy)) in RING.iter().enumerate() {
        let px = (x as i32 + dx) as usize;
        let py = (y as i32 + dy) as usize;
        values[i] = image.get(px, py).expect("ring within margin") as i16;
    }
    values
}

/// Segment test: at least `MIN_CONSECUTIVE` contiguous ring pixels all
/// brighter than `center + t` or all darker than `center - t`.
fn is_corner(values: &[i16; 16], center: i16, threshold: i16) -> bool {
    let bright = values.map(|v| v > center + threshold);
    let dark = values.map(|v| v < center - threshold);
    has_consecutive(&bright) || has_consecutive(&dark)
}

fn has_consecutive(flags: &[bool; 16]) -> bool {
    let mut run = 0usize;
    // Walk the ring twice to handle wrap-around runs.
    for i in 0..32 {
        if flags[i % 16] {
            run += 1;
            if run >= MIN_CONSECUTIVE {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Corner score: total ring contrast beyond the threshold.
fn corner_score(values: &[i16; 16], center: i16, threshold: i16) -> f32 {
    values
        .iter()
        .map(|&v| ((v - center).abs() - threshold).max(0) as f32)
        .sum()
}

/// Detects FAST-9 corners, keeping only local score maxima (3x3).
///
/// `margin` excludes a border so that downstream orientation and descriptor
/// patches always fit; it is raised to the ring radius if smaller.
pub fn detect_corners(image: ImageView<'_>, threshold: u8, margin: usize) -> Vec<Corner> {
    let margin = margin.max(3);
    let width = image.width();
    let height = image.height();
    if width <= 2 * margin || height <= 2 * margin {
        return Vec::new();
    }

    let threshold = i16::from(threshold);
    let mut scores = vec![0.0f32; width * height];
    let mut candidates = Vec::new();

    for y in margin..height - margin {
        let row = image.row(y).expect("row within image bounds");
        for x in margin..width - margin {
            let center = i16::from(row[x]);
            let values = ring_values(image, x, y);
            // Cheap rejection on the four compass points before the full test.
            let compass = [values[0], values[4], values[8], values[12]];
            let bright = compass.iter().filter(|&&v| v > center + threshold).count();
            let dark = compass.iter().filter(|&&v| v < center - threshold).count();
            if bright < 3 && dark < 3 {
                continue;
            }
            if !is_corner(&values, center, threshold) {
                continue;
            }
            let score = corner_score(&values, center, threshold);
            scores[y * width + x] = score;
            candidates.push((x, y, score));
        }
    }

    let mut corners = Vec::new();
    for (x, y, score) in candidates {
        let mut is_max = true;
        'nms: for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x as i32 + dx) as usize;
                let ny = (y as i32 + dy) as usize;
                let other = scores[ny * width + nx];
                if other > score || (other == score && (ny, nx) < (y, x)) {
                    is_max = false;
                    break 'nms;
                }
            }
        }
        if is_max {
            corners.push(Corner { x, y, score });
        }
    }
    corners
}
