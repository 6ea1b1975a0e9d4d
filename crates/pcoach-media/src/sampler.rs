//! Fixed-cadence frame sampling.
//!
//! Frames are picked by index (`start_frame`, `start_frame + interval * fps`,
//! ... up to `end_frame`) while decoding sequentially from the beginning of
//! the stream. Every decoded position is checked against the target set;
//! sampling stops as soon as all targets are collected.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;
use crate::source::{effective_fps, VideoSource};

/// Frame indices to sample inside `[start, start + duration)`.
pub fn target_indices(start: f64, duration: f64, interval: f64, fps: f64) -> Vec<u64> {
    let start_frame = (start.max(0.0) * fps) as u64;
    let end_frame = ((start.max(0.0) + duration.max(0.0)) * fps) as u64;
    let step = ((interval * fps) as u64).max(1) as usize;

    (start_frame..end_frame).step_by(step).collect()
}

/// Samples resized frames from a video at a fixed time cadence.
#[derive(Clone)]
pub struct FrameSampler {
    source: Arc<dyn VideoSource>,
    /// Seconds between sampled frames
    interval: f64,
    /// Canonical frame width
    width: u32,
    /// Canonical frame height
    height: u32,
}

impl FrameSampler {
    pub fn new(source: Arc<dyn VideoSource>, interval: f64, width: u32, height: u32) -> Self {
        Self {
            source,
            interval,
            width,
            height,
        }
    }

    pub fn source(&self) -> &Arc<dyn VideoSource> {
        &self.source
    }

    /// Sample frames in `[start, start + duration)`, resized to the canonical size.
    ///
    /// Fails with [`MediaError::VideoOpen`] when the video cannot be opened and
    /// [`MediaError::NoFramesFound`] when no target index was decoded.
    pub fn sample(&self, path: &Path, start: f64, duration: f64) -> MediaResult<Vec<Frame>> {
        let mut reader = self.source.open(path)?;
        let fps = effective_fps(reader.fps());
        let targets = target_indices(start, duration, self.interval, fps);
        let wanted: HashSet<u64> = targets.iter().copied().collect();

        debug!(
            "Sampling {} frames from {} ({:.1}s..{:.1}s at {:.2} fps, backend={})",
            targets.len(),
            path.display(),
            start,
            start + duration,
            fps,
            self.source.name()
        );

        let mut frames = Vec::with_capacity(targets.len());
        let mut position: u64 = 0;

        while frames.len() < targets.len() {
            if wanted.contains(&position) {
                match reader.read_frame()? {
                    Some(frame) => frames.push(frame.resized(self.width, self.height)),
                    None => break,
                }
            } else if !reader.skip_frame()? {
                break;
            }
            position += 1;
        }

        if frames.is_empty() {
            return Err(MediaError::no_frames_found(format!(
                "{} ({:.1}s..{:.1}s)",
                path.display(),
                start,
                start + duration
            )));
        }

        Ok(frames)
    }
}
