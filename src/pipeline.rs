use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, InputMode, OutputConfig};
use crate::error::{Result, WhisperBatchError};
use crate::media::{MediaProcessorFactory, MediaProcessorTrait};
use crate::subtitle;
use crate::transcribe::{TranscriberFactory, TranscriberTrait};

/// Outcome of one batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Subtitle files written, in processing order
    pub processed: Vec<PathBuf>,
    /// Source files that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Media tree → subtitle files: extract (video only), transcribe, convert
pub struct Pipeline {
    output: OutputConfig,
    media: Box<dyn MediaProcessorTrait>,
    transcriber: Box<dyn TranscriberTrait>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let media = MediaProcessorFactory::create_processor(config.media.clone());
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
        Self::with_collaborators(config.output, media, transcriber)
    }

    pub fn with_collaborators(
        output: OutputConfig,
        media: Box<dyn MediaProcessorTrait>,
        transcriber: Box<dyn TranscriberTrait>,
    ) -> Self {
        Self {
            output,
            media,
            transcriber,
        }
    }

    /// Check that the external tools this run needs can be launched
    pub async fn check_dependencies(&self) -> Result<()> {
        if self.output.mode == InputMode::Video {
            self.media.check_availability().await?;
        }
        self.transcriber.check_availability().await
    }

    /// Process every eligible file under `input_path` (or `input_path` itself
    /// when it is a file). A failing file is logged and skipped.
    pub async fn run<P: AsRef<Path>>(&self, input_path: P) -> Result<BatchReport> {
        let input_path = input_path.as_ref();
        info!("Processing {} in {:?} mode", input_path.display(), self.output.mode);

        if !input_path.exists() {
            return Err(WhisperBatchError::FileNotFound(input_path.display().to_string()));
        }

        let (root, media_files) = if input_path.is_file() {
            if !self.output.mode.accepts(input_path) {
                return Err(WhisperBatchError::Config(format!(
                    "{} is not a {:?} file (expected one of {:?})",
                    input_path.display(),
                    self.output.mode,
                    self.output.mode.extensions()
                )));
            }
            let root = input_path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            (root, vec![input_path.to_path_buf()])
        } else {
            (input_path.to_path_buf(), self.discover(input_path))
        };

        info!("Found {} media files to process", media_files.len());

        let progress = ProgressBar::new(media_files.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| WhisperBatchError::Config(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );

        let mut report = BatchReport::default();
        for media_path in media_files {
            progress.set_message(
                media_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );

            match self.process_file(&media_path, &root).await {
                Ok(subtitle_path) => {
                    info!("Successfully processed: {}", media_path.display());
                    if report.processed.contains(&subtitle_path) {
                        warn!(
                            "{} overwrote an earlier output with the same name: {}",
                            media_path.display(),
                            subtitle_path.display()
                        );
                    }
                    report.processed.push(subtitle_path);
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", media_path.display(), e);
                    report.failed.push((media_path, e.to_string()));
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Batch finished: {} processed, {} failed",
            report.processed.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn discover(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file() && self.output.mode.accepts(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    async fn process_file(&self, media_path: &Path, root: &Path) -> Result<PathBuf> {
        let stem = media_path
            .file_stem()
            .ok_or_else(|| WhisperBatchError::Config("Invalid media filename".to_string()))?
            .to_string_lossy()
            .into_owned();

        // Step 1: extract audio for video input
        let audio_path = match self.output.mode {
            InputMode::Audio => media_path.to_path_buf(),
            InputMode::Video => {
                let audio_path = self.audio_path_for(media_path, root, &stem);
                self.media.extract_audio(media_path, &audio_path).await?;
                audio_path
            }
        };

        // Step 2: transcribe
        let transcript_path = self.output.transcript_dir.join(format!("{}.json", stem));
        self.transcriber.transcribe(&audio_path, &transcript_path).await?;

        // Step 3: convert
        debug!("Converting {} to {}", transcript_path.display(), self.output.format);
        subtitle::convert_file(&transcript_path, self.output.format, &self.output.subtitle_dir)
    }

    /// `<audio_dir>/<parent relative to root>/<stem>.wav`
    fn audio_path_for(&self, media_path: &Path, root: &Path, stem: &str) -> PathBuf {
        let relative_dir = media_path
            .parent()
            .and_then(|parent| pathdiff::diff_paths(parent, root))
            .unwrap_or_default();
        self.output
            .audio_dir
            .join(relative_dir)
            .join(format!("{}.wav", stem))
    }
}
