use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::{MediaCommandBuilder, MediaProcessorTrait};
use crate::config::MediaConfig;
use crate::error::Result;

/// ffmpeg-backed media processor
pub struct MediaProcessorImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        if let Some(parent) = audio_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let command = self.command_builder.extract_audio(
            video_path,
            audio_path,
            self.config.sample_rate,
            self.config.channels,
        );
        command.execute().await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder.version_check().execute().await?;
        info!("Media processor is available");
        Ok(())
    }
}
