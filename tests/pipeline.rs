use std::sync::atomic::AtomicBool;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use retro_tape::config::ProcessingConfig;
use retro_tape::styles::vhs::{color, ringing::RingingFilter, tape_speed, RingPattern};
use retro_tape::video::{ChannelOrder, Frame, FrameProcessor};
use retro_tape::{FramePipeline, TapeSpeed, VhsParams};

fn assert_within_one(a: &Frame, b: &Frame) {
    assert_eq!(a.width(), b.width());
    assert_eq!(a.height(), b.height());
    for (x, y) in a.as_raw().iter().zip(b.as_raw()) {
        assert!((*x as i16 - *y as i16).abs() <= 1, "{} vs {}", x, y);
    }
}

#[test]
fn gray_frame_end_to_end_keeps_brightness() {
    let frame = Frame::new_filled(50, 50, [128, 128, 128]).unwrap();
    let params = VhsParams::from_json(
        r#"{"video_noise": 0, "chroma_noise": 0, "chroma_phase_noise": 0,
            "color_bleeding": 0, "vhs_out_sharpen": 1.0, "enable_ringing": true,
            "ringing_power": 2, "tape_speed": "SP"}"#,
    )
    .unwrap();

    let out = FramePipeline::new()
        .process(&frame, &params, &mut SmallRng::seed_from_u64(0))
        .unwrap();

    let mean = out.mean();
    assert!((127.5..=128.5).contains(&mean), "mean {}", mean);
}

#[test]
fn every_ringing_power_keeps_flat_planes_flat() {
    let filter = RingingFilter::new(RingPattern::default().into());
    for value in [0u8, 37, 128, 255] {
        let frame = Frame::new_filled(33, 20, [value, value, value]).unwrap();
        for power in 1..=3 {
            let before = color::forward(&frame);
            let mut after = before.clone();
            filter.apply(&mut after, power);
            assert!((after.y().mean() - before.y().mean()).abs() < 0.5);
            assert!((after.i().mean() - before.i().mean()).abs() < 0.5);
            assert!((after.q().mean() - before.q().mean()).abs() < 0.5);
        }
    }
}

#[test]
fn disabled_stages_are_a_passthrough() {
    // Horizontally constant content is invariant under the always-on tape blur
    let frame = Frame::from_fn(40, 30, |_, y| [(y * 8) as u8, 255 - (y * 8) as u8, 77]).unwrap();
    let out = FramePipeline::new()
        .process(&frame, &VhsParams::passthrough(), &mut SmallRng::seed_from_u64(3))
        .unwrap();
    assert_within_one(&frame, &out);
}

#[test]
fn colour_round_trip_is_lossless_within_rounding() {
    let frame = Frame::from_fn(256, 16, |x, y| [x as u8, (255 - x) as u8, (y * 16) as u8]).unwrap();
    let back = color::inverse(&color::forward(&frame), ChannelOrder::Bgr);
    assert_within_one(&frame, &back);
}

#[test]
fn tape_speed_blur_is_monotonic() {
    let frame = Frame::from_fn(64, 8, |x, _| if x % 4 < 2 { [0; 3] } else { [255; 3] }).unwrap();

    let energy = |speed: TapeSpeed| -> f64 {
        let mut yiq = color::forward(&frame);
        tape_speed::apply_tape_speed(&mut yiq, speed);
        let y = yiq.y();
        (0..y.height())
            .flat_map(|row| y.row(row).windows(2).map(|w| (w[1] - w[0]).abs() as f64).collect::<Vec<_>>())
            .sum()
    };

    let (sp, lp, ep) = (energy(TapeSpeed::Sp), energy(TapeSpeed::Lp), energy(TapeSpeed::Ep));
    assert!(sp > lp && lp > ep, "SP {} LP {} EP {}", sp, lp, ep);
}

#[test]
fn batch_output_matches_single_frame_processing() {
    let frames: Vec<Frame> = (0..6)
        .map(|i| Frame::from_fn(16, 12, |x, y| [(x * 10 + i) as u8, (y * 12) as u8, 90]).unwrap())
        .collect();
    let params = VhsParams {
        tape_speed: TapeSpeed::Lp,
        ..VhsParams::default()
    };
    let pipeline = FramePipeline::new();
    let config = ProcessingConfig {
        threads: 3,
        seed: Some(2024),
        progress_interval: 0,
    };

    let processor = FrameProcessor::new(&config).unwrap();
    let (first, _) = processor
        .process_frames(&pipeline, &params, &frames, &AtomicBool::new(false))
        .unwrap();
    let (second, _) = processor
        .process_frames(&pipeline, &params, &frames, &AtomicBool::new(false))
        .unwrap();

    assert_eq!(first.len(), frames.len());
    assert_eq!(first, second);
    assert!(first.iter().zip(&frames).all(|(out, inp)| out.width() == inp.width()));
}

#[test]
fn rgb_frames_come_back_in_rgb_order() {
    let data: Vec<u8> = (0..10 * 10).flat_map(|_| [200u8, 40, 10]).collect();
    let frame = Frame::from_raw(10, 10, ChannelOrder::Rgb, data).unwrap();
    let out = FramePipeline::new()
        .process(&frame, &VhsParams::passthrough(), &mut SmallRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(out.channel_order(), ChannelOrder::Rgb);
    assert_within_one(&frame, &out);
}

#[test]
fn each_stage_alone_keeps_gray_brightness() {
    let frame = Frame::new_filled(100, 100, [128, 128, 128]).unwrap();
    let pipeline = FramePipeline::new();
    let off = VhsParams::passthrough();

    let stages: Vec<(&str, VhsParams)> = vec![
        ("ringing", VhsParams { enable_ringing: true, ringing_power: 2, ..off.clone() }),
        ("luma noise", VhsParams { video_noise: 1000.0, ..off.clone() }),
        ("chroma noise", VhsParams { chroma_noise: 5000.0, ..off.clone() }),
        ("phase noise", VhsParams { chroma_phase_noise: 25.0, ..off.clone() }),
        ("color bleed", VhsParams { color_bleeding: 5.0, ..off.clone() }),
        ("sharpen", VhsParams { vhs_out_sharpen: 2.5, ..off.clone() }),
        ("LP", VhsParams { tape_speed: TapeSpeed::Lp, ..off.clone() }),
        ("EP", VhsParams { tape_speed: TapeSpeed::Ep, ..off.clone() }),
        ("defaults", VhsParams::default()),
    ];

    for (name, params) in stages {
        let out = pipeline
            .process(&frame, &params, &mut SmallRng::seed_from_u64(11))
            .unwrap();
        let retained = out.mean() / frame.mean();
        assert!(
            (0.95..=1.05).contains(&retained),
            "{} kept {:.1}% of the brightness",
            name,
            retained * 100.0
        );
    }
}
