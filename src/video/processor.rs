// src/video/processor.rs - parallel, order-preserving frame processing

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info};

use crate::config::ProcessingConfig;
use crate::error::{FrameError, Result, TapeError};
use crate::styles::{Style, VhsParams};
use crate::video::types::Frame;

/// Frames handed to the pool per round, per worker
const FRAMES_PER_WORKER: usize = 4;

/// Runs a style over a sequence of frames on a worker pool
///
/// Frames are independent, so any worker may take any frame; results are
/// always returned in input order.
pub struct FrameProcessor {
    pool: ThreadPool,
    threads: usize,
    seed: Option<u64>,
    progress_interval: usize,
}

impl FrameProcessor {
    pub fn new(config: &ProcessingConfig) -> Result<Self> {
        let threads = config.threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tape-worker-{}", i))
            .build()
            .map_err(|e| TapeError::generic(format!("Failed to start worker pool: {}", e)))?;

        Ok(Self {
            pool,
            threads,
            seed: config.seed,
            progress_interval: config.progress_interval,
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Process every frame, returning outputs in input order.
    ///
    /// Parameters and frame sizes are checked before any work starts. Once
    /// `cancel` is set no further frames are started; frames already running
    /// finish and the call returns [`TapeError::Cancelled`].
    pub fn process_frames(
        &self,
        style: &dyn Style,
        params: &VhsParams,
        frames: &[Frame],
        cancel: &AtomicBool,
    ) -> Result<(Vec<Frame>, ProcessingStats)> {
        style.validate_params(params)?;
        check_uniform_size(frames)?;

        info!(
            "Processing {} frames with {} style on {} threads",
            frames.len(),
            style.name(),
            self.threads
        );

        let started = Instant::now();
        let chunk_len = self.threads * FRAMES_PER_WORKER;
        let mut output = Vec::with_capacity(frames.len());

        for (chunk_idx, chunk) in frames.chunks(chunk_len.max(1)).enumerate() {
            if cancel.load(Ordering::Relaxed) {
                info!("Cancelled after {} of {} frames", output.len(), frames.len());
                return Err(TapeError::Cancelled { completed: output.len() });
            }

            let base = chunk_idx * chunk_len;
            let processed: Vec<Frame> = self.pool.install(|| {
                chunk
                    .par_iter()
                    .enumerate()
                    .map(|(offset, frame)| self.process_one(style, params, base + offset, frame))
                    .collect::<Result<Vec<_>>>()
            })?;

            let before = output.len();
            output.extend(processed);
            self.report_progress(before, output.len(), frames.len());
        }

        let stats = ProcessingStats::new(output.len(), started.elapsed());
        info!(
            "Processed {} frames in {:.2}s ({:.1} fps)",
            stats.frames,
            stats.elapsed.as_secs_f64(),
            stats.frames_per_second()
        );

        Ok((output, stats))
    }

    fn process_one(&self, style: &dyn Style, params: &VhsParams, index: usize, frame: &Frame) -> Result<Frame> {
        let mut rng = self.frame_rng(index);
        style.apply_effect(frame, params, &mut rng).map_err(|e| match e {
            TapeError::Frame(FrameError::InvalidDimension { .. }) => e,
            other => FrameError::ProcessingFailed {
                index,
                reason: other.to_string(),
            }
            .into(),
        })
    }

    /// Seeded per frame index so results do not depend on scheduling
    fn frame_rng(&self, index: usize) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => SmallRng::from_entropy(),
        }
    }

    fn report_progress(&self, before: usize, done: usize, total: usize) {
        if self.progress_interval == 0 {
            return;
        }
        if done / self.progress_interval > before / self.progress_interval || done == total {
            info!("Progress: {}/{} frames", done, total);
        } else {
            debug!("Finished frames {}..{}", before, done);
        }
    }
}

fn check_uniform_size(frames: &[Frame]) -> Result<()> {
    let Some(first) = frames.first() else {
        return Ok(());
    };

    for (index, frame) in frames.iter().enumerate().skip(1) {
        if frame.width() != first.width() || frame.height() != first.height() {
            return Err(TapeError::invalid_dimension(format!(
                "frame {} is {}x{}, expected {}x{}",
                index,
                frame.width(),
                frame.height(),
                first.width(),
                first.height()
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ProcessingStats {
    pub frames: usize,
    pub elapsed: Duration,
}

impl ProcessingStats {
    fn new(frames: usize, elapsed: Duration) -> Self {
        Self { frames, elapsed }
    }

    pub fn frames_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::FramePipeline;
    use rand::RngCore;

    fn config(threads: usize, seed: Option<u64>) -> ProcessingConfig {
        ProcessingConfig {
            threads,
            seed,
            progress_interval: 10,
        }
    }

    fn numbered_frames(count: usize) -> Vec<Frame> {
        (0..count)
            .map(|i| Frame::new_filled(8, 6, [i as u8 * 10, 100, 200 - i as u8 * 10]).unwrap())
            .collect()
    }

    #[test]
    fn test_output_keeps_input_order() {
        let processor = FrameProcessor::new(&config(3, Some(1))).unwrap();
        let frames = numbered_frames(17);
        let (out, stats) = processor
            .process_frames(&FramePipeline::new(), &VhsParams::passthrough(), &frames, &AtomicBool::new(false))
            .unwrap();

        assert_eq!(stats.frames, 17);
        for (a, b) in frames.iter().zip(&out) {
            for (x, y) in a.as_raw().iter().zip(b.as_raw()) {
                assert!((*x as i16 - *y as i16).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_seeded_batches_are_reproducible_across_thread_counts() {
        let frames = numbered_frames(9);
        let pipeline = FramePipeline::new();
        let params = VhsParams::default();
        let never = AtomicBool::new(false);

        let (one, _) = FrameProcessor::new(&config(1, Some(77)))
            .unwrap()
            .process_frames(&pipeline, &params, &frames, &never)
            .unwrap();
        let (four, _) = FrameProcessor::new(&config(4, Some(77)))
            .unwrap()
            .process_frames(&pipeline, &params, &frames, &never)
            .unwrap();

        assert_eq!(one, four);
    }

    #[test]
    fn test_cancel_before_start() {
        let processor = FrameProcessor::new(&config(2, None)).unwrap();
        let result = processor.process_frames(
            &FramePipeline::new(),
            &VhsParams::passthrough(),
            &numbered_frames(4),
            &AtomicBool::new(true),
        );
        assert!(matches!(result, Err(TapeError::Cancelled { completed: 0 })));
    }

    /// Copies frames through and raises the cancel flag on its first call
    struct CancelOnFirstFrame<'a> {
        cancel: &'a AtomicBool,
    }

    impl Style for CancelOnFirstFrame<'_> {
        fn name(&self) -> &str {
            "cancel-on-first"
        }

        fn description(&self) -> &str {
            "Test style that stops the batch"
        }

        fn apply_effect(&self, frame: &Frame, _params: &VhsParams, _rng: &mut dyn RngCore) -> Result<Frame> {
            self.cancel.store(true, Ordering::Relaxed);
            Ok(frame.clone())
        }
    }

    #[test]
    fn test_cancel_mid_batch_finishes_running_chunk() {
        // One worker means chunks of FRAMES_PER_WORKER frames
        let cancel = AtomicBool::new(false);
        let style = CancelOnFirstFrame { cancel: &cancel };
        let processor = FrameProcessor::new(&config(1, Some(3))).unwrap();

        let result = processor.process_frames(&style, &VhsParams::default(), &numbered_frames(10), &cancel);

        assert!(matches!(
            result,
            Err(TapeError::Cancelled { completed }) if completed == FRAMES_PER_WORKER
        ));
    }

    #[test]
    fn test_mixed_sizes_rejected() {
        let mut frames = numbered_frames(2);
        frames.push(Frame::new_filled(4, 4, [0, 0, 0]).unwrap());
        let processor = FrameProcessor::new(&config(2, None)).unwrap();
        let result = processor.process_frames(
            &FramePipeline::new(),
            &VhsParams::passthrough(),
            &frames,
            &AtomicBool::new(false),
        );
        assert!(matches!(result, Err(TapeError::Frame(FrameError::InvalidDimension { .. }))));
    }

    #[test]
    fn test_bad_params_rejected_up_front() {
        let params = VhsParams {
            video_noise: f32::INFINITY,
            ..VhsParams::default()
        };
        let processor = FrameProcessor::new(&config(1, None)).unwrap();
        let result = processor.process_frames(&FramePipeline::new(), &params, &numbered_frames(1), &AtomicBool::new(false));
        assert!(matches!(result, Err(TapeError::Style(_))));
    }

    #[test]
    fn test_empty_batch() {
        let processor = FrameProcessor::new(&config(2, None)).unwrap();
        let (out, stats) = processor
            .process_frames(&FramePipeline::new(), &VhsParams::default(), &[], &AtomicBool::new(false))
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.frames, 0);
    }
}
