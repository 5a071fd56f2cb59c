use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::timestamp::{srt_timestamp, vtt_timestamp};
use crate::error::WhisperBatchError;
use crate::transcript::{Segment, Transcript};

/// Output subtitle format. The set is closed; each variant renders its own
/// preamble and entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// Plain text, one segment per line
    Txt,
    /// SubRip
    Srt,
    /// WebVTT
    Vtt,
}

impl SubtitleFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Txt => "txt",
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }

    /// Emitted once at the start of the document
    pub fn preamble(&self) -> &'static str {
        match self {
            SubtitleFormat::Txt | SubtitleFormat::Srt => "",
            SubtitleFormat::Vtt => "WEBVTT\n\n",
        }
    }

    /// Render one segment. `index` is 1-based and ignored for plain text.
    pub fn format_entry(&self, segment: &Segment, index: usize) -> String {
        match self {
            SubtitleFormat::Txt => format!("{}\n", segment.text),
            SubtitleFormat::Srt => format!(
                "{}\n{} --> {}\n{}\n\n",
                index,
                srt_timestamp(segment.start),
                srt_timestamp(segment.end),
                segment.text
            ),
            SubtitleFormat::Vtt => format!(
                "{}\n{} --> {}\n{}\n\n",
                index,
                vtt_timestamp(segment.start),
                vtt_timestamp(segment.end),
                segment.text
            ),
        }
    }

    /// Preamble followed by every segment in input order
    pub fn render(&self, transcript: &Transcript) -> String {
        let mut document = String::from(self.preamble());
        for (index, segment) in transcript.segments.iter().enumerate() {
            document.push_str(&self.format_entry(segment, index + 1));
        }
        document
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = WhisperBatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(SubtitleFormat::Txt),
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" => Ok(SubtitleFormat::Vtt),
            _ => Err(WhisperBatchError::UnsupportedFormat(s.to_string())),
        }
    }
}
