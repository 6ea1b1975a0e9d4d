//! Enrichment client: one model round trip per problematic frame.

use std::sync::Arc;
use std::time::Instant;

use pcoach_media::encode_preview_image;
use tracing::{debug, info};

use crate::error::WorkerResult;
use crate::filter::ProblematicFrame;
use crate::metrics::record_enrichment_call;
use crate::prompt::{PromptTemplate, SYSTEM_INSTRUCTION};
use crate::vision::{FeedbackModel, FeedbackRequest};

/// Sends problematic frames to the feedback model, one at a time.
#[derive(Clone)]
pub struct EnrichmentClient {
    model: Arc<dyn FeedbackModel>,
    prompt: PromptTemplate,
    preview_max_size: u32,
    preview_quality: u8,
}

impl EnrichmentClient {
    pub fn new(
        model: Arc<dyn FeedbackModel>,
        prompt: PromptTemplate,
        preview_max_size: u32,
        preview_quality: u8,
    ) -> Self {
        Self {
            model,
            prompt,
            preview_max_size,
            preview_quality,
        }
    }

    /// Build the request for one frame.
    pub fn build_request(&self, frame: &ProblematicFrame) -> WorkerResult<FeedbackRequest> {
        Ok(FeedbackRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: self.prompt.render(&frame.scores)?,
            image_base64: encode_preview_image(
                &frame.frame,
                self.preview_max_size,
                self.preview_quality,
            )?,
        })
    }

    /// Return one raw model answer per frame, in order.
    ///
    /// Calls are sequential and never retried; the first failure aborts.
    pub async fn enrich(&self, frames: &[ProblematicFrame]) -> WorkerResult<Vec<String>> {
        let model = self.model.model_name().to_string();
        info!(model = %model, "Requesting feedback for {} frames", frames.len());

        let mut answers = Vec::with_capacity(frames.len());
        for frame in frames {
            let request = self.build_request(frame)?;

            let started = Instant::now();
            let result = self.model.complete(&request).await;
            record_enrichment_call(&model, result.is_ok(), started.elapsed().as_secs_f64());

            let text = result?;
            debug!(
                segment = frame.segment,
                frame = frame.frame_index,
                "Model answered in {:.2}s",
                started.elapsed().as_secs_f64()
            );
            answers.push(text);
        }

        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, WorkerError};
    use async_trait::async_trait;
    use pcoach_media::Frame;
    use pcoach_models::ScoreVector;
    use std::sync::Mutex;

    /// Answers from a script and records every request.
    struct ScriptedModel {
        answers: Mutex<Vec<Result<String, ProviderError>>>,
        seen: Mutex<Vec<FeedbackRequest>>,
    }

    impl ScriptedModel {
        fn new(answers: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                answers: Mutex::new(answers),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FeedbackModel for ScriptedModel {
        async fn complete(&self, request: &FeedbackRequest) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(request.clone());
            self.answers.lock().unwrap().remove(0)
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn problematic(index: u32) -> ProblematicFrame {
        ProblematicFrame {
            frame: Frame::filled(640, 360, [10, 10, 10]),
            segment: 0,
            frame_index: index,
            timestamp_secs: index as f64,
            scores: ScoreVector::new(0.9, 0.0, 0.1, 0.0),
        }
    }

    #[tokio::test]
    async fn test_one_call_per_frame_in_order() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
        ]));
        let client = EnrichmentClient::new(model.clone(), PromptTemplate::default(), 256, 70);

        let answers = client.enrich(&[problematic(0), problematic(1)]).await.unwrap();
        assert_eq!(answers, vec!["first", "second"]);

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].system_instruction, SYSTEM_INSTRUCTION);
        assert!(seen[0].prompt.contains("0.9"));
        assert!(!seen[0].image_base64.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_aborts_without_retry() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(ProviderError::RateLimited("slow down".to_string())),
            Ok("never".to_string()),
        ]));
        let client = EnrichmentClient::new(model.clone(), PromptTemplate::default(), 256, 70);

        let err = client
            .enrich(&[problematic(0), problematic(1)])
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::Provider(ProviderError::RateLimited(_))));
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }
}
