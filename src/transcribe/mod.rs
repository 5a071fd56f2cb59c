// Transcription
//
// The ASR engine is an external tool. Implementations of TranscriberTrait run
// it on one audio file and leave a transcript JSON document at the requested
// path; `crate::transcript` reads that document back.

pub mod insanely_fast_whisper;

use async_trait::async_trait;
use std::path::Path;

use crate::config::TranscriberConfig;
use crate::error::Result;

/// Main trait for transcription operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Transcribe `audio_path`, writing the ASR JSON to `transcript_path`
    async fn transcribe(&self, audio_path: &Path, transcript_path: &Path) -> Result<()>;

    /// Check if the ASR tool can be launched
    async fn check_availability(&self) -> Result<()>;
}

/// Transcriber implementation type
#[derive(Debug, Clone)]
pub enum TranscriberImplementation {
    InsanelyFastWhisper,
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    pub fn create_transcriber(
        implementation: TranscriberImplementation,
        config: TranscriberConfig,
    ) -> Box<dyn TranscriberTrait> {
        match implementation {
            TranscriberImplementation::InsanelyFastWhisper => {
                Box::new(insanely_fast_whisper::InsanelyFastWhisperTranscriber::new(config))
            }
        }
    }

    pub fn create_default(config: TranscriberConfig) -> Box<dyn TranscriberTrait> {
        Self::create_transcriber(TranscriberImplementation::InsanelyFastWhisper, config)
    }
}
