// src/styles/vhs/effect.rs - single-pass tape pipeline

use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::{debug, trace};

use crate::{
    error::{Result, StyleError},
    styles::traits::StyleMetadata,
    styles::Style,
    video::types::Frame,
};

use super::ring::{RingPattern, RING_PATTERN_SIZE};
use super::ringing::RingingFilter;
use super::{
    bleed, color, noise, sharpen, tape_speed, VhsParams, CHROMA_NOISE, CHROMA_PHASE_NOISE,
    COLOR_BLEEDING, ENABLE_RINGING, RINGING_POWER, TAPE_SPEED, VHS_OUT_SHARPEN, VIDEO_NOISE,
};

/// VHS tape degradation for one frame at a time
///
/// Stage order is fixed: YIQ conversion, ringing, luma noise, chroma noise,
/// colour bleed, tape-speed blur, back to the frame's channel order, output
/// sharpening. Band limiting comes before the noise because tape noise is
/// not band limited the same way, and sharpening only makes sense on the
/// reconstructed picture.
///
/// The ring pattern and per-size FFT data are built once and shared by every
/// frame, so one pipeline can serve a whole worker pool.
pub struct FramePipeline {
    ringing: RingingFilter,
}

/// The pipeline under its style name
pub type VhsStyle = FramePipeline;

impl FramePipeline {
    pub fn new() -> Self {
        Self::with_pattern(RingPattern::default())
    }

    /// Use a ring pattern with `size` samples instead of the default 720
    pub fn with_pattern_size(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(StyleError::InvalidParameter {
                key: "ring_pattern_size".to_string(),
                value: size.to_string(),
            }
            .into());
        }
        Ok(Self::with_pattern(RingPattern::generate(size)))
    }

    fn with_pattern(pattern: RingPattern) -> Self {
        debug!("Ring pattern ready with {} samples", pattern.len());
        Self {
            ringing: RingingFilter::new(Arc::new(pattern)),
        }
    }

    pub fn ring_pattern(&self) -> &RingPattern {
        self.ringing.pattern()
    }

    /// Run every stage on `frame` and return the degraded copy.
    pub fn process<R: Rng + ?Sized>(&self, frame: &Frame, params: &VhsParams, rng: &mut R) -> Result<Frame> {
        params.validate()?;
        trace!("Processing {}x{} frame", frame.width(), frame.height());

        let mut yiq = color::forward(frame);

        if params.enable_ringing {
            self.ringing.apply(&mut yiq, params.ringing_power);
        }

        noise::inject_luma(&mut yiq, params.video_noise, rng);
        noise::inject_chroma(&mut yiq, params.chroma_noise, params.chroma_phase_noise, rng);
        bleed::apply_color_bleed(&mut yiq, params.color_bleeding);
        tape_speed::apply_tape_speed(&mut yiq, params.tape_speed);

        let rebuilt = color::inverse(&yiq, frame.channel_order());
        Ok(sharpen::apply_output_sharpen(rebuilt, params.vhs_out_sharpen))
    }
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for FramePipeline {
    fn name(&self) -> &str {
        "vhs"
    }

    fn description(&self) -> &str {
        "Analog videotape degradation: ringing, tape noise, chroma bleed and tape-speed blur in YIQ"
    }

    fn apply_effect(&self, frame: &Frame, params: &VhsParams, rng: &mut dyn RngCore) -> Result<Frame> {
        self.process(frame, params, rng)
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.8, // two FFT passes per plane
            stochastic: true,
            parameters: vec![
                (VHS_OUT_SHARPEN.to_string(), "Output unsharp-mask strength (off at 1.0)".to_string()),
                (COLOR_BLEEDING.to_string(), "Chroma smear along scanlines (off at 0)".to_string()),
                (VIDEO_NOISE.to_string(), "Luma noise, sigma = value / 100".to_string()),
                (CHROMA_NOISE.to_string(), "Chroma noise, sigma = value / 100".to_string()),
                (CHROMA_PHASE_NOISE.to_string(), "Chroma phase jitter, sigma = value / 10 degrees".to_string()),
                (ENABLE_RINGING.to_string(), "Frequency-domain ringing on/off".to_string()),
                (RINGING_POWER.to_string(), "Ringing mask exponent (1-8)".to_string()),
                (TAPE_SPEED.to_string(), "SP, LP or EP".to_string()),
            ],
        }
    }
}
