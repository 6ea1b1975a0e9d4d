//! Artifact writer for feedback images.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pcoach_models::safe_timestamp;
use tracing::debug;
use uuid::Uuid;

use crate::error::{WorkerError, WorkerResult};

/// Writes decoded feedback images into the feedback directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Fail unless the feedback directory exists.
    pub async fn ensure_ready(&self) -> WorkerResult<()> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(WorkerError::config_error(format!(
                "feedback path is not a directory: {}",
                self.dir.display()
            ))),
            Err(e) => Err(WorkerError::config_error(format!(
                "feedback directory unavailable: {}: {}",
                self.dir.display(),
                e
            ))),
        }
    }

    /// `{video_id}_segment_{n}_frame_{m}_{timestamp}_{random}.jpg`
    pub fn artifact_name(video_id: &str, segment: u32, frame: u32, timestamp: &str) -> String {
        format!(
            "{}_segment_{}_frame_{}_{}_{}.jpg",
            video_id,
            segment,
            frame,
            safe_timestamp(timestamp),
            Uuid::new_v4().simple()
        )
    }

    /// Decode and persist one image, returning its path.
    pub async fn write(
        &self,
        video_id: &str,
        segment: u32,
        frame: u32,
        timestamp: &str,
        image_base64: &str,
    ) -> WorkerResult<PathBuf> {
        let bytes = STANDARD
            .decode(image_base64)
            .map_err(|e| WorkerError::artifact_write(format!("invalid base64 image: {e}")))?;

        let path = self
            .dir
            .join(Self::artifact_name(video_id, segment, frame, timestamp));

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| WorkerError::artifact_write(format!("{}: {}", path.display(), e)))?;

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                debug!("Wrote feedback image {} ({} bytes)", path.display(), bytes.len());
                Ok(path)
            }
            Ok(false) => Err(WorkerError::artifact_write(format!(
                "file missing after write: {}",
                path.display()
            ))),
            Err(e) => Err(WorkerError::artifact_write(format!("{}: {}", path.display(), e))),
        }
    }
}
