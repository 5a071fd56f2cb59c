use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WhisperBatchError};

/// insanely-fast-whisper JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    #[serde(default)]
    pub speakers: Vec<serde_json::Value>,
    pub chunks: Vec<WhisperChunk>,
    #[serde(default)]
    pub text: Option<String>,
}

/// insanely-fast-whisper chunk format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperChunk {
    /// `[start, end]` in seconds; the last chunk of a file can have a null end
    pub timestamp: (f64, Option<f64>),
    pub text: String,
}

/// A unit of transcribed speech with its time range in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new<S: Into<String>>(text: S, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

impl From<WhisperChunk> for Segment {
    fn from(chunk: WhisperChunk) -> Self {
        let (start, end) = chunk.timestamp;
        Self {
            text: chunk.text,
            start,
            end: end.unwrap_or(start),
        }
    }
}

/// Ordered segments of one transcription, in the order the ASR tool emitted them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<Segment>,
}

impl Transcript {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let output: WhisperOutput = serde_json::from_str(content)
            .map_err(|e| WhisperBatchError::MalformedTranscript(e.to_string()))?;
        Ok(output.into())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            WhisperBatchError::MalformedTranscript(reason) => {
                WhisperBatchError::MalformedTranscript(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<WhisperOutput> for Transcript {
    fn from(output: WhisperOutput) -> Self {
        Self {
            segments: output.chunks.into_iter().map(Segment::from).collect(),
        }
    }
}
