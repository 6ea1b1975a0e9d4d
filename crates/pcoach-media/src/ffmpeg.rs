//! FFmpeg-backed frame decoding.
//!
//! Spawns `ffmpeg` once per opened video and reads raw RGB frames from its
//! stdout pipe, in decode order, one `width * height * 3` chunk per frame.

use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;
use crate::probe::{probe_video, VideoInfo};
use crate::source::{FrameReader, StreamInfo, VideoSource};

/// Video source that decodes through the FFmpeg CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegSource;

impl FfmpegSource {
    pub fn new() -> Self {
        Self
    }

    fn decode_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-nostdin".to_string(),
            "-noautorotate".to_string(),
            "-i".to_string(),
            path.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-fps_mode".to_string(),
            "passthrough".to_string(),
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            "rgb24".to_string(),
            "pipe:1".to_string(),
        ]
    }

    fn probe(path: &Path) -> MediaResult<VideoInfo> {
        if !path.exists() {
            return Err(MediaError::video_open(format!(
                "file not found: {}",
                path.display()
            )));
        }
        probe_video(path).map_err(|e| MediaError::video_open(format!("{}: {}", path.display(), e)))
    }
}

/// Reported frame count, or duration times fps when the stream has none.
fn frame_count_of(info: &VideoInfo) -> Option<u64> {
    info.frame_count.or_else(|| {
        let fps = info.fps?;
        (info.duration > 0.0).then(|| (info.duration * fps).round() as u64)
    })
}

impl VideoSource for FfmpegSource {
    fn open(&self, path: &Path) -> MediaResult<Box<dyn FrameReader>> {
        let info = Self::probe(path)?;
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;
        if info.width == 0 || info.height == 0 {
            return Err(MediaError::video_open(format!(
                "{}: unknown frame size",
                path.display()
            )));
        }

        debug!(
            "Opening {} with ffmpeg ({}x{}, codec={})",
            path.display(),
            info.width,
            info.height,
            info.codec
        );

        let mut child = Command::new("ffmpeg")
            .args(Self::decode_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::video_open(format!("failed to spawn ffmpeg: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::internal("ffmpeg stdout not captured"))?;

        let frame_len = info.width as usize * info.height as usize * 3;
        Ok(Box::new(FfmpegReader {
            child,
            stdout: BufReader::new(stdout),
            buffer: vec![0; frame_len],
            info,
            finished: false,
        }))
    }

    fn stream_info(&self, path: &Path) -> MediaResult<StreamInfo> {
        let info = Self::probe(path)?;
        Ok(StreamInfo {
            fps: info.fps,
            frame_count: frame_count_of(&info),
        })
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

struct FfmpegReader {
    child: Child,
    stdout: BufReader<ChildStdout>,
    buffer: Vec<u8>,
    info: VideoInfo,
    finished: bool,
}

impl FfmpegReader {
    /// Fill the buffer with the next frame. `false` at end of stream.
    fn next_chunk(&mut self) -> MediaResult<bool> {
        if self.finished {
            return Ok(false);
        }
        match self.stdout.read_exact(&mut self.buffer) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.finished = true;
                Ok(false)
            }
            Err(e) => Err(MediaError::Io(e)),
        }
    }
}

impl FrameReader for FfmpegReader {
    fn fps(&self) -> Option<f64> {
        self.info.fps
    }

    fn frame_count(&self) -> Option<u64> {
        frame_count_of(&self.info)
    }

    fn skip_frame(&mut self) -> MediaResult<bool> {
        self.next_chunk()
    }

    fn read_frame(&mut self) -> MediaResult<Option<Frame>> {
        if !self.next_chunk()? {
            return Ok(None);
        }
        let image = image::RgbImage::from_raw(self.info.width, self.info.height, self.buffer.clone())
            .ok_or_else(|| MediaError::internal("raw frame size mismatch"))?;
        Ok(Some(Frame::new(image)))
    }
}

impl Drop for FfmpegReader {
    fn drop(&mut self) {
        // The pipe may still be open when sampling stops early.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
