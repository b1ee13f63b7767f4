//! NTSC YIQ conversion.
//!
//! The tape stages work on luma and chroma separately, so each frame is
//! taken from 8-bit RGB (in whatever channel order it arrived) into three
//! float planes and brought back after the analog stages have run.

use crate::video::types::{ChannelOrder, Frame, Plane, YiqPlanes};

/// Convert a frame into Y, I and Q planes.
pub fn forward(frame: &Frame) -> YiqPlanes {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let [ro, go, bo] = frame.channel_order().rgb_offsets();

    let len = width * height;
    let mut y = Vec::with_capacity(len);
    let mut i = Vec::with_capacity(len);
    let mut q = Vec::with_capacity(len);

    for px in frame.as_raw().chunks_exact(3) {
        let r = px[ro] as f32;
        let g = px[go] as f32;
        let b = px[bo] as f32;

        y.push(0.299 * r + 0.587 * g + 0.114 * b);
        i.push(0.596 * r - 0.274 * g - 0.322 * b);
        q.push(0.211 * r - 0.523 * g + 0.312 * b);
    }

    YiqPlanes {
        y: Plane::from_parts(width, height, y),
        i: Plane::from_parts(width, height, i),
        q: Plane::from_parts(width, height, q),
    }
}

/// Convert Y, I and Q planes back into an 8-bit frame in `order`.
///
/// Out-of-range values are clamped to 0..=255 and rounded.
pub fn inverse(yiq: &YiqPlanes, order: ChannelOrder) -> Frame {
    let width = yiq.width();
    let height = yiq.height();
    let [ro, go, bo] = order.rgb_offsets();

    let mut data = vec![0u8; width * height * 3];
    let planes = yiq.y().as_slice().iter().zip(yiq.i().as_slice()).zip(yiq.q().as_slice());

    for (px, ((&y, &i), &q)) in data.chunks_exact_mut(3).zip(planes) {
        let r = y + 0.956 * i + 0.619 * q;
        let g = y - 0.272 * i - 0.647 * q;
        let b = y - 1.105 * i + 1.702 * q;

        px[ro] = to_sample(r);
        px[go] = to_sample(g);
        px[bo] = to_sample(b);
    }

    Frame::from_parts(width as u32, height as u32, order, data)
}

/// Clamp to the 8-bit range and round to the nearest sample
#[inline]
pub(crate) fn to_sample(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_within_one_sample() {
        let frame = Frame::from_fn(64, 64, |x, y| {
            [(x * 4) as u8, (y * 4) as u8, ((x * 7 + y * 13) % 256) as u8]
        })
        .unwrap();

        let back = inverse(&forward(&frame), ChannelOrder::Bgr);

        for (a, b) in frame.as_raw().iter().zip(back.as_raw()) {
            assert!((*a as i16 - *b as i16).abs() <= 1, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_roundtrip_extremes() {
        for color in [[0, 0, 0], [255, 255, 255], [255, 0, 0], [0, 255, 0], [0, 0, 255]] {
            let frame = Frame::new_filled(2, 2, color).unwrap();
            let back = inverse(&forward(&frame), ChannelOrder::Bgr);
            for (a, b) in frame.as_raw().iter().zip(back.as_raw()) {
                assert!((*a as i16 - *b as i16).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_gray_has_no_chroma() {
        let frame = Frame::new_filled(3, 3, [128, 128, 128]).unwrap();
        let yiq = forward(&frame);
        assert!((yiq.y().get(1, 1) - 128.0).abs() < 1e-3);
        assert!(yiq.i().get(1, 1).abs() < 1e-3);
        assert!(yiq.q().get(1, 1).abs() < 1e-3);
    }

    #[test]
    fn test_channel_order_is_respected() {
        // Pure red, once as BGR and once as RGB
        let bgr = Frame::from_raw(1, 1, ChannelOrder::Bgr, vec![0, 0, 255]).unwrap();
        let rgb = Frame::from_raw(1, 1, ChannelOrder::Rgb, vec![255, 0, 0]).unwrap();
        assert_eq!(forward(&bgr), forward(&rgb));

        let back = inverse(&forward(&rgb), ChannelOrder::Rgb);
        assert_eq!(back.channel_order(), ChannelOrder::Rgb);
        assert!(back.as_raw()[0] >= 254);
    }

    #[test]
    fn test_inverse_clamps() {
        let y = Plane::filled(1, 1, 400.0).unwrap();
        let i = Plane::filled(1, 1, 0.0).unwrap();
        let q = Plane::filled(1, 1, 0.0).unwrap();
        let frame = inverse(&YiqPlanes::new(y, i, q).unwrap(), ChannelOrder::Bgr);
        assert_eq!(frame.as_raw(), &[255, 255, 255]);
        assert_eq!(to_sample(-3.0), 0);
        assert_eq!(to_sample(f32::NAN), 0);
    }
}
