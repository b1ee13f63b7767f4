//! Output unsharp mask, the playback deck's "sharpness" knob.

use crate::video::types::{Frame, Plane};

use super::blur::{blur_2d, gaussian_kernel};
use super::color::to_sample;

const SHARPEN_KERNEL_SIZE: usize = 3;
const SHARPEN_SIGMA: f64 = 1.0;

/// Boost contrast with `strength·frame + (1 − strength)·blur(frame)`.
///
/// Returns the frame unchanged when `strength <= 1.0`.
pub fn apply_output_sharpen(frame: Frame, strength: f32) -> Frame {
    if strength <= 1.0 {
        return frame;
    }

    let width = frame.width();
    let height = frame.height();
    let order = frame.channel_order();
    let pixels = width as usize * height as usize;
    let kernel = gaussian_kernel(SHARPEN_KERNEL_SIZE, SHARPEN_SIGMA);

    let mut data = frame.into_raw();
    for channel in 0..3 {
        let samples: Vec<f32> = data.iter().skip(channel).step_by(3).map(|&v| v as f32).collect();
        let mut blurred = Plane::from_parts(width as usize, height as usize, samples);
        blur_2d(&mut blurred, &kernel);

        for (idx, &b) in (0..pixels).zip(blurred.as_slice()) {
            let slot = &mut data[idx * 3 + channel];
            *slot = to_sample(strength * *slot as f32 + (1.0 - strength) * b);
        }
    }

    Frame::from_parts(width, height, order, data)
}
