//! whisper-batch - batch media transcription into subtitle files
//!
//! Extracts audio with ffmpeg, transcribes it with insanely-fast-whisper and
//! renders the transcript as SRT, WebVTT or plain text.

pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod subtitle;
pub mod transcribe;
pub mod transcript;
