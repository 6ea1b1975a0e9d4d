//! Pipeline orchestrator.
//!
//! Walks a video segment by segment. Each segment runs two phases:
//! 1. Sample and score every frame locally, keeping the problematic ones.
//! 2. Only if phase 1 found something, ask the feedback model about each
//!    problematic frame, parse the answer and persist the image.
//!
//! Everything is strictly sequential and any error other than a landmark
//! detection failure aborts the whole video.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pcoach_media::{
    encode_feedback_image, video_duration, Frame, FrameSampler, LandmarkDetector, VideoSource,
};
use pcoach_models::{format_timestamp, FeedbackRecord, FeedbackReport};
use tracing::{debug, Instrument};

use crate::artifact::ArtifactWriter;
use crate::config::PipelineConfig;
use crate::enrichment::EnrichmentClient;
use crate::error::{WorkerError, WorkerResult};
use crate::filter::{ProblematicFrame, SegmentFilter};
use crate::logging::VideoLogger;
use crate::metrics::record_feedback_record;
use crate::parser::parse_feedback_text;
use crate::prompt::PromptTemplate;
use crate::vision::FeedbackModel;

/// Start offsets (seconds) of every segment covering `duration`.
///
/// The last segment may be shorter than `segment_length`.
pub fn segment_starts(duration_secs: f64, segment_length: u32) -> Vec<u32> {
    if segment_length == 0 || !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Vec::new();
    }
    (0..duration_secs as u32)
        .step_by(segment_length as usize)
        .collect()
}

/// Runs the feedback pipeline for one video at a time.
pub struct VideoProcessor {
    config: PipelineConfig,
    sampler: FrameSampler,
    filter: SegmentFilter,
    enrichment: EnrichmentClient,
    artifacts: ArtifactWriter,
}

impl VideoProcessor {
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn VideoSource>,
        detector: Arc<dyn LandmarkDetector>,
        model: Arc<dyn FeedbackModel>,
        prompt: PromptTemplate,
    ) -> Self {
        let sampler = FrameSampler::new(
            source,
            config.frame_interval_secs,
            config.frame_width,
            config.frame_height,
        );
        let filter = SegmentFilter::new(detector, config.thresholds);
        let enrichment = EnrichmentClient::new(
            model,
            prompt,
            config.preview_max_size,
            config.preview_jpeg_quality,
        );
        let artifacts = ArtifactWriter::new(config.feedback_dir.clone());

        Self {
            config,
            sampler,
            filter,
            enrichment,
            artifacts,
        }
    }

    /// Produce feedback records for a video.
    ///
    /// An empty report (problem `none`) is a successful outcome.
    pub async fn process(&self, video_path: &Path, video_id: &str) -> WorkerResult<FeedbackReport> {
        let logger = VideoLogger::new(video_id, "feedback_analysis");
        let span = logger.create_span();

        async {
            logger.log_start(&video_path.display().to_string());
            match self.run(video_path, video_id, &logger).await {
                Ok(report) => {
                    logger.log_completion(&report.message);
                    Ok(report)
                }
                Err(e) => {
                    logger.log_error(&e.to_string());
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        video_path: &Path,
        video_id: &str,
        logger: &VideoLogger,
    ) -> WorkerResult<FeedbackReport> {
        self.config.validate()?;
        self.artifacts.ensure_ready().await?;

        let duration = self.probe_duration(video_path).await?;
        let starts = segment_starts(duration, self.config.segment_length_secs);
        logger.log_progress(&format!(
            "{:.1}s video, {} segments of {}s",
            duration,
            starts.len(),
            self.config.segment_length_secs
        ));

        let mut records = Vec::new();
        for (segment, start) in starts.into_iter().enumerate() {
            let segment = segment as u32;

            // Phase 1: local scoring
            let frames = self.sample_segment(video_path, start).await?;
            let sampled = frames.len();
            let problematic = self
                .filter
                .filter(
                    frames,
                    segment,
                    start as f64,
                    self.config.frame_interval_secs,
                )
                .await;

            logger.log_progress(&format!(
                "segment {}: {} frames sampled, {} problematic",
                segment,
                sampled,
                problematic.len()
            ));
            if problematic.is_empty() {
                continue;
            }

            // Phase 2: enrichment and persistence
            let answers = self.enrichment.enrich(&problematic).await?;
            for (frame, answer) in problematic.iter().zip(answers) {
                if let Some(record) = self.build_record(video_id, frame, &answer).await? {
                    records.push(record);
                }
            }
        }

        Ok(FeedbackReport::from_records(records))
    }

    async fn probe_duration(&self, video_path: &Path) -> WorkerResult<f64> {
        let source = self.sampler.source().clone();
        let path = video_path.to_path_buf();

        let duration = tokio::task::spawn_blocking(move || video_duration(source.as_ref(), &path))
            .await
            .map_err(|e| WorkerError::video_open(format!("duration probe task failed: {e}")))??;
        Ok(duration)
    }

    async fn sample_segment(
        &self,
        video_path: &Path,
        start: u32,
    ) -> WorkerResult<Vec<Frame>> {
        let sampler = self.sampler.clone();
        let path: PathBuf = video_path.to_path_buf();
        let length = self.config.segment_length_secs as f64;

        let frames = tokio::task::spawn_blocking(move || sampler.sample(&path, start as f64, length))
            .await
            .map_err(|e| WorkerError::segment_extraction(format!("sampling task failed: {e}")))??;

        if frames.is_empty() {
            return Err(WorkerError::segment_extraction(format!(
                "no frames in segment starting at {start}s"
            )));
        }
        Ok(frames)
    }

    /// Parse, encode and persist one answered frame.
    ///
    /// Returns `None` when the model found nothing to improve.
    async fn build_record(
        &self,
        video_id: &str,
        frame: &ProblematicFrame,
        answer: &str,
    ) -> WorkerResult<Option<FeedbackRecord>> {
        let sections = parse_feedback_text(answer)?;
        if !sections.problem_detected() {
            debug!(
                segment = frame.segment,
                frame = frame.frame_index,
                "Model reported no problem"
            );
            return Ok(None);
        }

        let image_base64 = encode_feedback_image(
            &frame.frame,
            self.config.feedback_image_width,
            self.config.feedback_image_height,
            self.config.feedback_jpeg_quality,
        )?;

        let timestamp = format_timestamp(frame.timestamp_secs);
        self.artifacts
            .write(
                video_id,
                frame.segment,
                frame.frame_index,
                &timestamp,
                &image_base64,
            )
            .await?;
        record_feedback_record();

        Ok(Some(FeedbackRecord {
            video_id: video_id.to_string(),
            frame_index: frame.frame_index,
            timestamp,
            sections,
            image_base64,
        }))
    }
}
