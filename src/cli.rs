use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, InputMode, Task, TimestampLevel};
use crate::subtitle::SubtitleFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe every media file under a directory into subtitles
    Batch(BatchArgs),

    /// Convert an insanely-fast-whisper transcript JSON into a subtitle file
    Convert {
        /// Input transcript file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle format
        #[arg(short = 'f', long)]
        subtitle_format: Option<SubtitleFormat>,

        /// Output directory (defaults to the configured subtitle directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Extract audio from video file
    Extract {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Transcribe one audio file into transcript JSON
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output transcript file
        #[arg(short, long)]
        output: PathBuf,

        /// Source language hint
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Write the default configuration to a TOML file
    Config {
        /// Output configuration file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

/// Flags for `batch`. Anything left unset keeps the configured value.
#[derive(ClapArgs, Debug)]
pub struct BatchArgs {
    /// Path to the media file(s) to be transcribed
    #[arg(long)]
    pub input_path: PathBuf,

    /// `video` extracts audio with ffmpeg first; `audio` starts from audio files
    #[arg(long)]
    pub mode: Option<InputMode>,

    /// Format of the output file
    #[arg(short = 'f', long)]
    pub subtitle_format: Option<SubtitleFormat>,

    /// Path to save the extracted audio
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// Path to save the transcript JSON
    #[arg(long)]
    pub transcript_path: Option<PathBuf>,

    /// Path to save the subtitles
    #[arg(long)]
    pub subtitle_path: Option<PathBuf>,

    /// Pretrained model or checkpoint used for ASR
    #[arg(long)]
    pub model_name: Option<String>,

    /// Transcribe, or translate to English
    #[arg(long)]
    pub task: Option<Task>,

    /// Language of the input audio (auto-detected when unset)
    #[arg(long)]
    pub language: Option<String>,

    /// Number of parallel batches; reduce on OOM
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// GPU device number, or "mps" for Apple Silicon
    #[arg(long)]
    pub device_id: Option<String>,

    /// Use Flash Attention 2 (`--flash false` turns off a configured default)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub flash: Option<bool>,

    /// Chunk or word level timestamps
    #[arg(long)]
    pub timestamp: Option<TimestampLevel>,

    /// hf.co token for speaker diarization
    #[arg(long)]
    pub hf_token: Option<String>,

    /// Diarization model name
    #[arg(long)]
    pub diarization_model: Option<String>,
}

impl BatchArgs {
    /// Layer the command-line flags over a loaded configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.output.mode = mode;
        }
        if let Some(format) = self.subtitle_format {
            config.output.format = format;
        }
        if let Some(path) = &self.output_path {
            config.output.audio_dir = path.clone();
        }
        if let Some(path) = &self.transcript_path {
            config.output.transcript_dir = path.clone();
        }
        if let Some(path) = &self.subtitle_path {
            config.output.subtitle_dir = path.clone();
        }

        let transcriber = &mut config.transcriber;
        if let Some(model_name) = &self.model_name {
            transcriber.model_name = model_name.clone();
        }
        if let Some(task) = self.task {
            transcriber.task = task;
        }
        if let Some(language) = &self.language {
            transcriber.language = Some(language.clone());
        }
        if let Some(batch_size) = self.batch_size {
            transcriber.batch_size = batch_size;
        }
        if let Some(device_id) = &self.device_id {
            transcriber.device_id = device_id.clone();
        }
        if let Some(flash) = self.flash {
            transcriber.flash = flash;
        }
        if let Some(timestamp) = self.timestamp {
            transcriber.timestamp = timestamp;
        }
        if let Some(token) = &self.hf_token {
            transcriber.hf_token = Some(token.clone());
        }
        if let Some(model) = &self.diarization_model {
            transcriber.diarization_model = model.clone();
        }

        config
    }
}
