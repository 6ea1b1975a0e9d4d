//! Presentation feedback worker binary.
//!
//! Usage: `pcoach-worker <video_path> <video_id>`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pcoach_media::{FfmpegSource, VideoSource};
use pcoach_ml_client::LandmarkClient;
use pcoach_worker::{PipelineConfig, PromptTemplate, VideoBackend, VideoProcessor, VisionClient};

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("pcoach=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

fn video_source(backend: VideoBackend) -> Arc<dyn VideoSource> {
    match backend {
        #[cfg(feature = "opencv")]
        VideoBackend::OpenCv => Arc::new(pcoach_media::OpenCvSource::new()),
        #[cfg(not(feature = "opencv"))]
        VideoBackend::OpenCv => {
            warn!("VIDEO_BACKEND=opencv but built without the opencv feature; using ffmpeg");
            Arc::new(FfmpegSource::new())
        }
        VideoBackend::Ffmpeg => Arc::new(FfmpegSource::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    dotenvy::dotenv().ok();
    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let (Some(video_path), Some(video_id)) = (args.next(), args.next()) else {
        eprintln!("usage: pcoach-worker <video_path> <video_id>");
        std::process::exit(2);
    };
    let video_path = PathBuf::from(video_path);

    info!("Starting pcoach-worker");

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    tokio::fs::create_dir_all(&config.feedback_dir)
        .await
        .with_context(|| format!("creating {}", config.feedback_dir.display()))?;

    let prompt = match PromptTemplate::load(config.prompt_path.as_deref()).await {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to load prompt: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    let model = match VisionClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create vision client: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    let detector = LandmarkClient::from_env().context("creating landmark client")?;
    if !detector.health_check().await.unwrap_or(false) {
        warn!("Landmark service is not healthy; frames will score as undetected");
    }

    let processor = VideoProcessor::new(
        config.clone(),
        video_source(config.video_backend),
        Arc::new(detector),
        Arc::new(model),
        prompt,
    );

    match processor.process(&video_path, &video_id).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            error!(status = e.status_code(), "Processing failed: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
