//! Frequency-domain ringing.
//!
//! Each plane goes through a 2-D FFT, has its centred spectrum multiplied by
//! a radial mask sampled from the [`RingPattern`], and comes back through the
//! inverse FFT. The mask never touches the zero-frequency bin, and the plane
//! mean is re-locked to its pre-filter value afterwards so a flat input stays
//! flat.
//!
//! The mask is built in centred (shifted) coordinates but stored in the
//! FFT's natural layout, which makes the shift/unshift pair an index mapping
//! done once per frame size instead of two copies per plane.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use tracing::{debug, trace};

use crate::video::types::{Plane, YiqPlanes};

use super::ring::RingPattern;

/// Per-size lookup data: FFT plans plus each bin's position in the pattern
struct SpectralGrid {
    rows: usize,
    cols: usize,
    /// Pattern index for every bin, natural FFT layout, row-major
    pattern_index: Vec<usize>,
    row_forward: Arc<dyn Fft<f32>>,
    row_inverse: Arc<dyn Fft<f32>>,
    col_forward: Arc<dyn Fft<f32>>,
    col_inverse: Arc<dyn Fft<f32>>,
}

impl SpectralGrid {
    fn new(rows: usize, cols: usize, pattern_len: usize) -> Self {
        let center_y = rows / 2;
        let center_x = cols / 2;
        let max_dist = ((center_y * center_y + center_x * center_x) as f64).sqrt();
        let last = pattern_len.saturating_sub(1);

        let mut pattern_index = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            // Where this bin lands once the spectrum is shifted to the centre
            let dy = ((r + center_y) % rows) as f64 - center_y as f64;
            for c in 0..cols {
                let dx = ((c + center_x) % cols) as f64 - center_x as f64;
                let norm = if max_dist > 0.0 { (dy * dy + dx * dx).sqrt() / max_dist } else { 0.0 };
                let idx = (norm * last as f64) as usize;
                pattern_index.push(idx.min(last));
            }
        }

        let mut planner = FftPlanner::<f32>::new();
        Self {
            rows,
            cols,
            pattern_index,
            row_forward: planner.plan_fft_forward(cols),
            row_inverse: planner.plan_fft_inverse(cols),
            col_forward: planner.plan_fft_forward(rows),
            col_inverse: planner.plan_fft_inverse(rows),
        }
    }

    fn transform(&self, data: &mut [Complex<f32>], scratch: &mut Vec<Complex<f32>>, inverse: bool) {
        let (row_fft, col_fft) = if inverse {
            (&self.row_inverse, &self.col_inverse)
        } else {
            (&self.row_forward, &self.col_forward)
        };

        row_fft.process(data);

        scratch.resize(data.len(), Complex::new(0.0, 0.0));
        transpose(data, scratch, self.rows, self.cols);
        col_fft.process(scratch);
        transpose(scratch, data, self.cols, self.rows);
    }
}

fn transpose(src: &[Complex<f32>], dst: &mut [Complex<f32>], rows: usize, cols: usize) {
    for r in 0..rows {
        for c in 0..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
}

/// Bandwidth-limiting filter shared by every frame of a pipeline
pub struct RingingFilter {
    pattern: Arc<RingPattern>,
    grids: RwLock<HashMap<(usize, usize), Arc<SpectralGrid>>>,
}

impl RingingFilter {
    /// An empty `pattern` leaves every frequency untouched.
    pub fn new(pattern: Arc<RingPattern>) -> Self {
        Self {
            pattern,
            grids: RwLock::new(HashMap::new()),
        }
    }

    pub fn pattern(&self) -> &RingPattern {
        &self.pattern
    }

    /// Number of frame sizes with cached lookup data
    pub fn cached_sizes(&self) -> usize {
        self.grids.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Filter all three planes in place with the mask raised to `power`.
    pub fn apply(&self, yiq: &mut YiqPlanes, power: u32) {
        let grid = self.grid_for(yiq.height(), yiq.width());
        let mask = self.mask(&grid, power);

        let mut buffer = Vec::with_capacity(grid.rows * grid.cols);
        let mut scratch = Vec::with_capacity(grid.rows * grid.cols);
        for plane in yiq.planes_mut() {
            filter_plane(plane, &grid, &mask, &mut buffer, &mut scratch);
        }
    }

    fn mask(&self, grid: &SpectralGrid, power: u32) -> Vec<f32> {
        let samples = self.pattern.as_slice();
        let exponent = power.min(i32::MAX as u32) as i32;
        let mut mask: Vec<f32> = grid
            .pattern_index
            .iter()
            .map(|&idx| samples.get(idx).map_or(1.0, |s| s.powi(exponent)))
            .collect();

        // Zero frequency sits at index 0 in natural layout and must pass untouched
        mask[0] = 1.0;
        mask
    }

    fn grid_for(&self, rows: usize, cols: usize) -> Arc<SpectralGrid> {
        if let Some(grid) = self.grids.read().unwrap_or_else(PoisonError::into_inner).get(&(rows, cols)) {
            return Arc::clone(grid);
        }

        debug!("Building ringing lookup for {}x{} frames", cols, rows);
        let grid = Arc::new(SpectralGrid::new(rows, cols, self.pattern.len()));
        let mut grids = self.grids.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(grids.entry((rows, cols)).or_insert(grid))
    }
}

fn filter_plane(
    plane: &mut Plane,
    grid: &SpectralGrid,
    mask: &[f32],
    buffer: &mut Vec<Complex<f32>>,
    scratch: &mut Vec<Complex<f32>>,
) {
    let original_dc = plane.mean();

    buffer.clear();
    buffer.extend(plane.as_slice().iter().map(|&v| Complex::new(v, 0.0)));

    grid.transform(buffer, scratch, false);
    for (bin, &m) in buffer.iter_mut().zip(mask) {
        *bin *= m;
    }
    grid.transform(buffer, scratch, true);

    let scale = 1.0 / buffer.len() as f32;
    for (out, bin) in plane.as_mut_slice().iter_mut().zip(buffer.iter()) {
        *out = bin.re * scale;
    }

    let current_dc = plane.mean();
    if current_dc != 0.0 {
        let correction = (original_dc / current_dc) as f32;
        for v in plane.as_mut_slice() {
            *v *= correction;
        }
    } else {
        trace!("Plane mean is zero after ringing, skipping DC correction");
    }
}
