//! # Retro Style System
//!
//! Frame effects behind the [`Style`] trait. The built-in VHS style is the
//! single-pass tape pipeline in [`vhs`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rand::SeedableRng;
//! use retro_tape::styles::{FramePipeline, VhsParams};
//! use retro_tape::video::Frame;
//!
//! # fn main() -> retro_tape::Result<()> {
//! let pipeline = FramePipeline::new();
//! let frame = Frame::new_filled(320, 240, [128, 128, 128])?;
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let taped = pipeline.process(&frame, &VhsParams::default(), &mut rng)?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod vhs;

pub use traits::{Style, StyleMetadata};
pub use vhs::{FramePipeline, TapeSpeed, VhsParams, VhsStyle};
