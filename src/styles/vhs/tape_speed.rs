//! Horizontal resolution loss from tape speed.

use crate::video::types::YiqPlanes;

use super::blur::{blur_horizontal, gaussian_kernel};
use super::params::TapeSpeed;

/// Blur Y, I and Q along each row with the preset's kernel.
pub fn apply_tape_speed(yiq: &mut YiqPlanes, speed: TapeSpeed) {
    let kernel = gaussian_kernel(speed.blur_kernel(), 0.0);
    for plane in yiq.planes_mut() {
        blur_horizontal(plane, &kernel);
    }
}
