// Transcript to subtitle conversion
//
// - timestamp: clock-string codec shared by SRT and WebVTT
// - format: the closed set of output formats and their entry grammar
// - writer: renders a transcript and writes it to disk

pub mod format;
pub mod timestamp;
pub mod writer;

pub use format::SubtitleFormat;
pub use timestamp::{format_timestamp, parse_timestamp, srt_timestamp, vtt_timestamp};
pub use writer::{convert, convert_file, convert_named};
