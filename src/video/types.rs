use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TapeError};

/// Sample order of an interleaved 3-channel frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Blue, green, red (what most video decoders hand out)
    #[default]
    Bgr,
    /// Red, green, blue
    Rgb,
}

impl ChannelOrder {
    /// Byte offsets of the red, green and blue samples within a pixel
    pub fn rgb_offsets(self) -> [usize; 3] {
        match self {
            ChannelOrder::Bgr => [2, 1, 0],
            ChannelOrder::Rgb => [0, 1, 2],
        }
    }
}

/// Represents a single video frame
///
/// Owns interleaved 8-bit samples, three per pixel, row-major. The channel
/// order travels with the data so stages can resolve red/green/blue
/// regardless of how the decoder delivered them.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl Frame {
    /// Create a frame from raw interleaved samples
    ///
    /// Fails with `InvalidDimension` when either side is zero or the buffer
    /// length is not `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TapeError::invalid_dimension(format!(
                "frame must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(TapeError::invalid_dimension(format!(
                "{}x{} frame needs {} samples, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        Ok(Self { width, height, order, data })
    }

    /// Assemble a frame whose shape the caller has already established
    pub(crate) fn from_parts(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 3);
        Self { width, height, order, data }
    }

    /// Create a BGR frame with every pixel set to `bgr`
    pub fn new_filled(width: u32, height: u32, bgr: [u8; 3]) -> Result<Self> {
        Self::from_fn(width, height, |_, _| bgr)
    }

    /// Create a BGR frame from a per-pixel generator returning `[b, g, r]`
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::from_raw(width, height, ChannelOrder::Bgr, data)
    }

    /// Build a BGR frame from a decoded RGB image
    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        Self::from_fn(image.width(), image.height(), |x, y| {
            let Rgb([r, g, b]) = *image.get_pixel(x, y);
            [b, g, r]
        })
    }

    /// Convert the frame to an RGB image buffer for encoding
    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| Rgb(self.rgb(x, y)))
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Get a pixel's samples in the frame's native channel order
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Get a pixel resolved to `[r, g, b]`
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let px = self.pixel(x, y);
        let [r, g, b] = self.order.rgb_offsets();
        [px[r], px[g], px[b]]
    }

    /// Raw interleaved samples
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Mean over every sample of every channel
    pub fn mean(&self) -> f64 {
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        sum as f64 / self.data.len() as f64
    }
}

/// A single-channel float image, row-major
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Plane {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(TapeError::invalid_dimension(format!(
                "{}x{} plane cannot hold {} samples",
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Assemble a plane whose shape the caller has already established
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        self.data.chunks_exact_mut(self.width)
    }

    /// Arithmetic mean, accumulated in f64
    pub fn mean(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64
    }

    fn same_shape(&self, other: &Plane) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Luma plus the two chrominance planes of one frame
///
/// Y sits roughly in the 0-255 domain, I and Q are signed.
#[derive(Clone, Debug, PartialEq)]
pub struct YiqPlanes {
    pub(crate) y: Plane,
    pub(crate) i: Plane,
    pub(crate) q: Plane,
}

impl YiqPlanes {
    /// Bundle three planes, rejecting mismatched shapes
    pub fn new(y: Plane, i: Plane, q: Plane) -> Result<Self> {
        if !y.same_shape(&i) || !y.same_shape(&q) {
            return Err(TapeError::invalid_dimension(format!(
                "YIQ planes disagree: Y {}x{}, I {}x{}, Q {}x{}",
                y.width, y.height, i.width, i.height, q.width, q.height
            )));
        }
        Ok(Self { y, i, q })
    }

    pub fn width(&self) -> usize {
        self.y.width
    }

    pub fn height(&self) -> usize {
        self.y.height
    }

    pub fn y(&self) -> &Plane {
        &self.y
    }

    pub fn i(&self) -> &Plane {
        &self.i
    }

    pub fn q(&self) -> &Plane {
        &self.q
    }

    /// All three planes, Y first
    pub fn planes_mut(&mut self) -> [&mut Plane; 3] {
        [&mut self.y, &mut self.i, &mut self.q]
    }

    pub fn into_planes(self) -> (Plane, Plane, Plane) {
        (self.y, self.i, self.q)
    }
}
