//! Radial response curve used by the ringing filter.

use std::f64::consts::PI;

/// Number of samples in the default response curve
pub const RING_PATTERN_SIZE: usize = 720;

/// A normalized 1-D frequency response in `[0, 1]`
///
/// Generated once per pipeline and shared read-only by every frame and
/// channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RingPattern {
    samples: Vec<f32>,
}

impl RingPattern {
    /// Build the damped-sine response over `size` samples.
    ///
    /// `x` runs linearly over `[0, 2π]`; the base curve is
    /// `sin(4x)·e^(−x/4)`, normalized, then a second harmonic
    /// `0.3·sin(8x)·e^(−x/2)` is added and the whole thing normalized again.
    pub fn generate(size: usize) -> Self {
        let step = if size > 1 { 2.0 * PI / (size - 1) as f64 } else { 0.0 };
        let xs: Vec<f64> = (0..size).map(|i| i as f64 * step).collect();

        let mut pattern: Vec<f64> = xs.iter().map(|&x| (4.0 * x).sin() * (-x / 4.0).exp()).collect();
        normalize(&mut pattern);

        for (value, &x) in pattern.iter_mut().zip(&xs) {
            *value += 0.3 * (8.0 * x).sin() * (-x / 2.0).exp();
        }
        normalize(&mut pattern);

        Self {
            samples: pattern.into_iter().map(|v| v as f32).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Sample at a normalized position in `[0, 1]`, clamped to the table
    pub fn sample(&self, position: f64) -> f32 {
        match self.samples.len() {
            0 => 1.0,
            len => {
                let idx = (position * (len - 1) as f64) as isize;
                self.samples[idx.clamp(0, len as isize - 1) as usize]
            }
        }
    }
}

impl Default for RingPattern {
    fn default() -> Self {
        Self::generate(RING_PATTERN_SIZE)
    }
}

/// Min-max normalize in place; a flat curve collapses to all zeros.
fn normalize(values: &mut [f64]) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    for v in values.iter_mut() {
        *v = if range > 0.0 { ((*v - min) / range).clamp(0.0, 1.0) } else { 0.0 };
    }
}
