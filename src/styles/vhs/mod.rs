//! # VHS Style Implementation
//!
//! Emulates a single pass through a consumer videotape deck. Frames are
//! taken into YIQ, band limited in the frequency domain, hit with luma and
//! chroma noise, smeared along scanlines, blurred according to tape speed,
//! and rebuilt with the deck's output sharpening.

pub mod blur;
pub mod bleed;
pub mod color;
mod effect;
pub mod noise;
mod params;
pub mod ring;
pub mod ringing;
pub mod sharpen;
pub mod tape_speed;

pub use effect::{FramePipeline, VhsStyle};
pub use params::{TapeSpeed, VhsParams, MAX_COLOR_BLEEDING, MAX_RINGING_POWER};
pub use ring::RingPattern;
pub use ringing::RingingFilter;

// Parameter keys as they appear in parameter files
pub const COMPOSITE_PREEMPHASIS: &str = "composite_preemphasis";
pub const VHS_OUT_SHARPEN: &str = "vhs_out_sharpen";
pub const COLOR_BLEEDING: &str = "color_bleeding";
pub const VIDEO_NOISE: &str = "video_noise";
pub const CHROMA_NOISE: &str = "chroma_noise";
pub const CHROMA_PHASE_NOISE: &str = "chroma_phase_noise";
pub const ENABLE_RINGING: &str = "enable_ringing";
pub const RINGING_POWER: &str = "ringing_power";
pub const TAPE_SPEED: &str = "tape_speed";
