//! # Video Frame Module
//!
//! Frame and plane types plus the worker pool that runs a style over a
//! decoded frame sequence. Decoding and encoding stay with the caller.

pub mod types;
pub mod processor;

pub use types::{ChannelOrder, Frame, Plane, YiqPlanes};
pub use processor::{FrameProcessor, ProcessingStats};
