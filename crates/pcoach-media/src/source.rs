//! Video source abstraction.
//!
//! A [`VideoSource`] opens a file and hands back a [`FrameReader`] that
//! decodes frames strictly in order. Readers never seek: container seeking
//! is unreliable on many formats, so callers skip forward instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;

/// Frame rate assumed when the container does not report one.
pub const DEFAULT_FPS: f64 = 30.0;

/// Sequential frame decoder for one opened video.
pub trait FrameReader {
    /// Frames per second reported by the container, if any.
    fn fps(&self) -> Option<f64>;

    /// Total frame count reported by the container, if any.
    fn frame_count(&self) -> Option<u64>;

    /// Advance past the next frame without keeping its pixels.
    ///
    /// Returns `false` once the stream is exhausted.
    fn skip_frame(&mut self) -> MediaResult<bool>;

    /// Decode the next frame, or `None` at end of stream.
    fn read_frame(&mut self) -> MediaResult<Option<Frame>>;
}

/// Container-level stream facts, read without decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamInfo {
    pub fps: Option<f64>,
    pub frame_count: Option<u64>,
}

/// Opens videos for sequential decoding.
pub trait VideoSource: Send + Sync {
    /// Open a video. Fails with [`MediaError::VideoOpen`] when unreadable.
    fn open(&self, path: &Path) -> MediaResult<Box<dyn FrameReader>>;

    /// Frame rate and frame count of a video.
    ///
    /// The default opens a reader; backends with a cheaper probe override it.
    fn stream_info(&self, path: &Path) -> MediaResult<StreamInfo> {
        let reader = self.open(path)?;
        Ok(StreamInfo {
            fps: reader.fps(),
            frame_count: reader.frame_count(),
        })
    }

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Reported fps, or [`DEFAULT_FPS`] when missing, zero or not finite.
pub fn effective_fps(reported: Option<f64>) -> f64 {
    match reported {
        Some(fps) if fps.is_finite() && fps > 0.0 => fps,
        _ => DEFAULT_FPS,
    }
}

/// Total duration in seconds, from frame count and fps.
pub fn video_duration(source: &dyn VideoSource, path: &Path) -> MediaResult<f64> {
    let info = source.stream_info(path)?;
    let fps = effective_fps(info.fps);
    let total_frames = info
        .frame_count
        .filter(|count| *count > 0)
        .ok_or_else(|| {
            MediaError::InvalidVideo(format!("frame count unavailable: {}", path.display()))
        })?;

    Ok(total_frames as f64 / fps)
}

/// A clip held in memory.
#[derive(Debug, Clone)]
pub struct MemoryClip {
    pub fps: Option<f64>,
    pub frames: Arc<Vec<Frame>>,
}

impl MemoryClip {
    pub fn new(fps: Option<f64>, frames: Vec<Frame>) -> Self {
        Self {
            fps,
            frames: Arc::new(frames),
        }
    }
}

/// Video source backed by pre-decoded frames, keyed by path.
///
/// Useful for clips that are already decoded and for driving the pipeline
/// without a codec.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    clips: HashMap<PathBuf, MemoryClip>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, path: impl Into<PathBuf>, clip: MemoryClip) -> Self {
        self.clips.insert(path.into(), clip);
        self
    }
}

impl VideoSource for MemorySource {
    fn open(&self, path: &Path) -> MediaResult<Box<dyn FrameReader>> {
        let clip = self
            .clips
            .get(path)
            .ok_or_else(|| MediaError::video_open(path.display().to_string()))?;

        Ok(Box::new(MemoryReader {
            clip: clip.clone(),
            position: 0,
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryReader {
    clip: MemoryClip,
    position: usize,
}

impl FrameReader for MemoryReader {
    fn fps(&self) -> Option<f64> {
        self.clip.fps
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.clip.frames.len() as u64)
    }

    fn skip_frame(&mut self) -> MediaResult<bool> {
        if self.position < self.clip.frames.len() {
            self.position += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn read_frame(&mut self) -> MediaResult<Option<Frame>> {
        let frame = self.clip.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(fps: Option<f64>, count: usize) -> MemoryClip {
        MemoryClip::new(fps, vec![Frame::filled(4, 4, [0, 0, 0]); count])
    }

    #[test]
    fn test_effective_fps_fallback() {
        assert_eq!(effective_fps(None), DEFAULT_FPS);
        assert_eq!(effective_fps(Some(0.0)), DEFAULT_FPS);
        assert_eq!(effective_fps(Some(f64::NAN)), DEFAULT_FPS);
        assert_eq!(effective_fps(Some(25.0)), 25.0);
    }

    #[test]
    fn test_video_duration() {
        let source = MemorySource::new().with_clip("talk.mp4", clip(Some(10.0), 1200));
        let duration = video_duration(&source, Path::new("talk.mp4")).unwrap();
        assert!((duration - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_video_duration_uses_default_fps() {
        let source = MemorySource::new().with_clip("talk.mp4", clip(None, 90));
        let duration = video_duration(&source, Path::new("talk.mp4")).unwrap();
        assert!((duration - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_clip_has_no_duration() {
        let source = MemorySource::new().with_clip("empty.mp4", clip(Some(30.0), 0));
        let err = video_duration(&source, Path::new("empty.mp4")).unwrap_err();
        assert!(matches!(err, MediaError::InvalidVideo(_)));
    }

    /// Answers stream facts but cannot decode.
    struct HeaderOnlySource;

    impl VideoSource for HeaderOnlySource {
        fn open(&self, path: &Path) -> MediaResult<Box<dyn FrameReader>> {
            Err(MediaError::video_open(path.display().to_string()))
        }

        fn stream_info(&self, _path: &Path) -> MediaResult<StreamInfo> {
            Ok(StreamInfo {
                fps: Some(25.0),
                frame_count: Some(250),
            })
        }

        fn name(&self) -> &'static str {
            "header-only"
        }
    }

    #[test]
    fn test_video_duration_does_not_decode() {
        let duration = video_duration(&HeaderOnlySource, Path::new("talk.mp4")).unwrap();
        assert!((duration - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_stream_info_reads_the_clip() {
        let source = MemorySource::new().with_clip("talk.mp4", clip(Some(24.0), 48));
        let info = source.stream_info(Path::new("talk.mp4")).unwrap();
        assert_eq!(
            info,
            StreamInfo {
                fps: Some(24.0),
                frame_count: Some(48)
            }
        );
    }

    #[test]
    fn test_unknown_path_fails_to_open() {
        let source = MemorySource::new();
        assert!(matches!(
            source.open(Path::new("missing.mp4")),
            Err(MediaError::VideoOpen(_))
        ));
    }

    #[test]
    fn test_reader_is_sequential() {
        let source = MemorySource::new().with_clip("a.mp4", clip(Some(30.0), 2));
        let mut reader = source.open(Path::new("a.mp4")).unwrap();
        assert!(reader.skip_frame().unwrap());
        assert!(reader.read_frame().unwrap().is_some());
        assert!(reader.read_frame().unwrap().is_none());
        assert!(!reader.skip_frame().unwrap());
    }
}
