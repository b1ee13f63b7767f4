//! Chroma bleed along scanlines.
//!
//! The chroma carrier on tape has far less bandwidth than luma, so colour
//! smears to the right of edges. I and Q get a causal box filter per row
//! (zero state at the start of each line), followed by a horizontal Gaussian
//! of the same length. Y is left alone.

use crate::video::types::{Plane, YiqPlanes};

use super::blur::{blur_horizontal, gaussian_kernel};
use super::MAX_COLOR_BLEEDING;

/// Taps used for a given bleed amount: `2·⌊amount⌋ + 1`, always odd
///
/// Amounts above [`MAX_COLOR_BLEEDING`] are treated as the maximum.
pub fn kernel_len(amount: f32) -> usize {
    if amount <= 0.0 {
        return 1;
    }
    2 * amount.min(MAX_COLOR_BLEEDING).floor() as usize + 1
}

/// Smear I and Q along each row. No-op when `amount <= 0`.
pub fn apply_color_bleed(yiq: &mut YiqPlanes, amount: f32) {
    if amount <= 0.0 {
        return;
    }

    let taps = kernel_len(amount);
    let gaussian = gaussian_kernel(taps, 0.0);

    for plane in [&mut yiq.i, &mut yiq.q] {
        causal_box_filter(plane, taps);
        blur_horizontal(plane, &gaussian);
    }
}

/// `y[n] = (x[n] + x[n-1] + … + x[n-taps+1]) / taps`, with `x[<0] = 0`
fn causal_box_filter(plane: &mut Plane, taps: usize) {
    let weight = 1.0 / taps as f32;
    let mut history = vec![0.0f32; plane.width()];

    for row in plane.rows_mut() {
        history.copy_from_slice(row);
        let mut acc = 0.0f32;
        for (n, out) in row.iter_mut().enumerate() {
            acc += history[n];
            if n >= taps {
                acc -= history[n - taps];
            }
            *out = acc * weight;
        }
    }
}
