//! Separable Gaussian blur on float planes.
//!
//! Every smoothing step in the tape pipeline is a 1-D Gaussian applied along
//! rows, columns, or both. Kernels follow the usual image-processing
//! conventions: a non-positive sigma is derived from the kernel size, the
//! small odd sizes (1, 3, 5, 7) use the fixed binomial-style tables, and
//! borders reflect without repeating the edge sample (`dcb|abcd|cba`).

use crate::video::types::Plane;

const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Build a normalized 1-D Gaussian kernel of `size` taps.
///
/// `size` is rounded up to the next odd number; zero yields the identity
/// kernel.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    let size = if size == 0 { 1 } else { size | 1 };

    if sigma <= 0.0 && size <= 7 {
        return SMALL_KERNELS[size / 2].to_vec();
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let center = (size / 2) as f64;
    let scale = -0.5 / (sigma * sigma);
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();

    weights.iter().map(|w| (w / total) as f32).collect()
}

/// Map an out-of-range index back into `0..len` by mirror reflection
/// around the edge samples.
#[inline]
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let folded = index.rem_euclid(period);
    if folded >= len as isize {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

/// Convolve every row with `kernel`.
pub fn blur_horizontal(plane: &mut Plane, kernel: &[f32]) {
    if kernel.len() <= 1 {
        return;
    }

    let width = plane.width();
    let radius = (kernel.len() / 2) as isize;
    let mut source = vec![0.0f32; width];

    for row in plane.rows_mut() {
        source.copy_from_slice(row);
        for (x, out) in row.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| w * source[reflect_101(x as isize + k as isize - radius, width)])
                .sum();
        }
    }
}

/// Convolve every column with `kernel`.
pub fn blur_vertical(plane: &mut Plane, kernel: &[f32]) {
    if kernel.len() <= 1 {
        return;
    }

    let width = plane.width();
    let height = plane.height();
    let radius = (kernel.len() / 2) as isize;
    let source = plane.as_slice().to_vec();

    for (y, row) in plane.rows_mut().enumerate() {
        row.fill(0.0);
        for (k, &w) in kernel.iter().enumerate() {
            let sy = reflect_101(y as isize + k as isize - radius, height);
            let src_row = &source[sy * width..(sy + 1) * width];
            for (out, &s) in row.iter_mut().zip(src_row) {
                *out += w * s;
            }
        }
    }
}

/// Square Gaussian blur: the same kernel along rows, then columns.
pub fn blur_2d(plane: &mut Plane, kernel: &[f32]) {
    blur_horizontal(plane, kernel);
    blur_vertical(plane, kernel);
}
