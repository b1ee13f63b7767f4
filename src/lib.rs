//! # Retro-Tape
//!
//! Analog videotape degradation for decoded video frames.
//!
//! Each frame goes through a fixed chain: RGB to YIQ, frequency-domain
//! ringing with the mean brightness locked, luma and chroma noise, chroma
//! phase jitter, colour bleed along scanlines, tape-speed blur, back to RGB,
//! and an output unsharp mask.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::atomic::AtomicBool;
//!
//! use retro_tape::{
//!     config::Config,
//!     styles::FramePipeline,
//!     video::{Frame, FrameProcessor},
//! };
//!
//! # fn main() -> retro_tape::Result<()> {
//! let config = Config::default();
//! let pipeline = FramePipeline::new();
//! let processor = FrameProcessor::new(&config.processing)?;
//!
//! let frames = vec![Frame::new_filled(640, 480, [40, 90, 160])?; 24];
//! let (taped, stats) = processor.process_frames(
//!     &pipeline,
//!     &config.vhs,
//!     &frames,
//!     &AtomicBool::new(false),
//! )?;
//! assert_eq!(taped.len(), stats.frames);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`styles`] - The [`Style`] trait and the VHS tape pipeline
//! - [`video`] - Frame types and the parallel frame processor
//! - [`config`] - Configuration management
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod styles;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{Result, TapeError},
    styles::{FramePipeline, Style, TapeSpeed, VhsParams},
    video::Frame,
};
