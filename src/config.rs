use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WhisperBatchError};
use crate::subtitle::SubtitleFormat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcriber: TranscriberConfig,
    pub media: MediaConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Path to the insanely-fast-whisper binary
    pub binary_path: String,
    /// Pretrained model or checkpoint used for ASR
    pub model_name: String,
    /// Transcribe in the source language or translate to English
    pub task: Task,
    /// Source language; auto-detected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Number of parallel batches to compute
    pub batch_size: u32,
    /// GPU device number, or "mps" on Apple Silicon
    pub device_id: String,
    /// Use Flash Attention 2
    pub flash: bool,
    /// Timestamp granularity
    pub timestamp: TimestampLevel,
    /// hf.co token, only needed for diarization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hf_token: Option<String>,
    /// Diarization model passed along with the token
    pub diarization_model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Transcribe,
    Translate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimestampLevel {
    Chunk,
    Word,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Sample rate of extracted audio
    pub sample_rate: u32,
    /// Channel count of extracted audio
    pub channels: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Which media files the batch picks up
    pub mode: InputMode,
    /// Subtitle format to write
    pub format: SubtitleFormat,
    /// Extracted audio, mirrored under the input tree layout
    pub audio_dir: PathBuf,
    /// Transcript JSON files written by the ASR tool
    pub transcript_dir: PathBuf,
    /// Subtitle files
    pub subtitle_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Audio files go straight to transcription
    Audio,
    /// Video files have their first audio track extracted first
    Video,
}

impl InputMode {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            InputMode::Audio => &["mp3", "wav"],
            InputMode::Video => &["mp4", "avi", "mov", "mkv"],
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions().contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: "insanely-fast-whisper".to_string(),
            model_name: "openai/whisper-large-v3".to_string(),
            task: Task::Transcribe,
            language: None,
            batch_size: 24,
            device_id: "0".to_string(),
            flash: false,
            timestamp: TimestampLevel::Chunk,
            hf_token: None,
            diarization_model: "pyannote/speaker-diarization-3.1".to_string(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            sample_rate: 16000,
            channels: 1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        let base = PathBuf::from(".").join("output");
        Self {
            mode: InputMode::Audio,
            format: SubtitleFormat::Srt,
            audio_dir: base.join("temp"),
            transcript_dir: base.join("transcript"),
            subtitle_dir: base.join("subtitle"),
        }
    }
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Transcribe => "transcribe",
            Task::Translate => "translate",
        }
    }
}

impl TimestampLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampLevel::Chunk => "chunk",
            TimestampLevel::Word => "word",
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WhisperBatchError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| WhisperBatchError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| WhisperBatchError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| WhisperBatchError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
