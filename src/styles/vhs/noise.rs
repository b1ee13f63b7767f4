//! Tape noise: smoothed Gaussian grain on luma and chroma, plus chroma
//! phase jitter.
//!
//! Amounts use the tape-processor scale, where the standard deviation in
//! plane units is `amount / 100` (so the default luma amount of 1000 gives a
//! sigma of 10). The random source is always passed in so seeded runs are
//! reproducible.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::video::types::{Plane, YiqPlanes};

use super::blur::{blur_2d, gaussian_kernel};

/// Smoothing kernel applied to freshly drawn noise
const NOISE_KERNEL_SIZE: usize = 3;

/// Add smoothed Gaussian noise to Y. No-op when `amount <= 0`.
pub fn inject_luma<R: Rng + ?Sized>(yiq: &mut YiqPlanes, amount: f32, rng: &mut R) {
    if amount <= 0.0 {
        return;
    }
    add_smoothed_noise(&mut yiq.y, amount / 100.0, rng);
}

/// Add smoothed Gaussian noise to I and Q, then rotate each pixel's (I, Q)
/// vector by a random angle.
///
/// The rotation angle is drawn per pixel with a standard deviation of
/// `phase_degrees / 10` degrees. Each half is skipped when its amount is
/// `<= 0`.
pub fn inject_chroma<R: Rng + ?Sized>(yiq: &mut YiqPlanes, amount: f32, phase_degrees: f32, rng: &mut R) {
    if amount > 0.0 {
        let sigma = amount / 100.0;
        add_smoothed_noise(&mut yiq.i, sigma, rng);
        add_smoothed_noise(&mut yiq.q, sigma, rng);
    }

    if phase_degrees > 0.0 {
        rotate_phase(&mut yiq.i, &mut yiq.q, phase_degrees / 10.0, rng);
    }
}

fn add_smoothed_noise<R: Rng + ?Sized>(plane: &mut Plane, sigma: f32, rng: &mut R) {
    let noise_data: Vec<f32> = (0..plane.as_slice().len())
        .map(|_| rng.sample::<f32, _>(StandardNormal) * sigma)
        .collect();

    let mut noise = Plane::from_parts(plane.width(), plane.height(), noise_data);
    blur_2d(&mut noise, &gaussian_kernel(NOISE_KERNEL_SIZE, 0.0));

    for (v, n) in plane.as_mut_slice().iter_mut().zip(noise.as_slice()) {
        *v += n;
    }
}

fn rotate_phase<R: Rng + ?Sized>(i: &mut Plane, q: &mut Plane, sigma_degrees: f32, rng: &mut R) {
    for (iv, qv) in i.as_mut_slice().iter_mut().zip(q.as_mut_slice()) {
        let theta = (rng.sample::<f32, _>(StandardNormal) * sigma_degrees).to_radians();
        let (sin, cos) = theta.sin_cos();
        let (i0, q0) = (*iv, *qv);
        *iv = i0 * cos - q0 * sin;
        *qv = i0 * sin + q0 * cos;
    }
}
