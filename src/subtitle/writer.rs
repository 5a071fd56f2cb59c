use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::SubtitleFormat;
use crate::error::{Result, WhisperBatchError};
use crate::transcript::Transcript;

/// Render `transcript` and write it to `<output_dir>/<source_stem>.<ext>`.
///
/// The output directory is created if missing. An existing file at the target
/// path is replaced in one rename, so a failed write never leaves a truncated
/// file behind.
pub fn convert<P: AsRef<Path>>(
    transcript: &Transcript,
    format: SubtitleFormat,
    output_dir: P,
    source_stem: &str,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    let output_path = output_dir.join(format!("{}.{}", source_stem, format.extension()));
    info!("Generating {} file: {}", format, output_path.display());

    let document = format.render(transcript);

    std::fs::create_dir_all(output_dir)?;
    write_atomic(&output_path, document.as_bytes())?;

    info!(
        "{} file generated successfully ({} segments)",
        format,
        transcript.segments.len()
    );
    Ok(output_path)
}

/// Same as [`convert`], with the format given by name (`txt`, `srt` or `vtt`).
/// An unknown name fails before anything touches the filesystem.
pub fn convert_named<P: AsRef<Path>>(
    transcript: &Transcript,
    format: &str,
    output_dir: P,
    source_stem: &str,
) -> Result<PathBuf> {
    let format: SubtitleFormat = format.parse()?;
    convert(transcript, format, output_dir, source_stem)
}

/// Load an ASR transcript JSON file and convert it. The subtitle takes the
/// transcript file's stem.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    transcript_path: P,
    format: SubtitleFormat,
    output_dir: Q,
) -> Result<PathBuf> {
    let transcript_path = transcript_path.as_ref();
    let source_stem = transcript_path
        .file_stem()
        .ok_or_else(|| {
            WhisperBatchError::Config(format!(
                "Invalid transcript filename: {}",
                transcript_path.display()
            ))
        })?
        .to_string_lossy()
        .into_owned();

    debug!("Loading transcript {}", transcript_path.display());
    let transcript = Transcript::from_file(transcript_path)?;
    convert(&transcript, format, output_dir, &source_stem)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| WhisperBatchError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Segment;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn hi_bye() -> Transcript {
        Transcript::new(vec![
            Segment::new("Hi", 0.0, 1.0),
            Segment::new("Bye", 1.0, 2.0),
        ])
    }

    #[test]
    fn test_convert_writes_named_file() {
        let temp = TempDir::new().unwrap();
        let path = convert(&hi_bye(), SubtitleFormat::Srt, temp.path(), "talk").unwrap();

        assert_eq!(path, temp.path().join("talk.srt"));
        temp.child("talk.srt").assert(
            "1\n00:00:00,000 --> 00:00:01,000\nHi\n\n2\n00:00:01,000 --> 00:00:02,000\nBye\n\n",
        );
    }

    #[test]
    fn test_convert_creates_nested_output_dir() {
        let temp = TempDir::new().unwrap();
        let output_dir = temp.path().join("output").join("subtitle");

        let path = convert(&hi_bye(), SubtitleFormat::Txt, &output_dir, "talk").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Hi\nBye\n");

        // Existing directory is fine
        convert(&hi_bye(), SubtitleFormat::Vtt, &output_dir, "talk").unwrap();
        let vtt = std::fs::read_to_string(output_dir.join("talk.vtt")).unwrap();
        assert!(vtt.starts_with("WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.000\nHi\n\n"));
    }

    #[test]
    fn test_convert_twice_overwrites() {
        let temp = TempDir::new().unwrap();
        let longer = Transcript::new(vec![Segment::new("a much longer line of text", 0.0, 9.0); 5]);

        convert(&longer, SubtitleFormat::Srt, temp.path(), "clip").unwrap();
        let first = convert(&hi_bye(), SubtitleFormat::Srt, temp.path(), "clip").unwrap();
        let first_bytes = std::fs::read(&first).unwrap();
        let second = convert(&hi_bye(), SubtitleFormat::Srt, temp.path(), "clip").unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, std::fs::read(&second).unwrap());
        assert_eq!(first_bytes, SubtitleFormat::Srt.render(&hi_bye()).into_bytes());
    }

    #[test]
    fn test_convert_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        convert(&hi_bye(), SubtitleFormat::Srt, temp.path(), "clip").unwrap();

        let names: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("clip.srt")]);
    }

    #[test]
    fn test_empty_transcript_writes_preamble() {
        let temp = TempDir::new().unwrap();
        let empty = Transcript::default();

        let vtt = convert(&empty, SubtitleFormat::Vtt, temp.path(), "silence").unwrap();
        let srt = convert(&empty, SubtitleFormat::Srt, temp.path(), "silence").unwrap();

        assert_eq!(std::fs::read_to_string(vtt).unwrap(), "WEBVTT\n\n");
        assert_eq!(std::fs::read_to_string(srt).unwrap(), "");
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let output_dir = temp.path().join("subs");

        let err = convert_named(&hi_bye(), "ass", &output_dir, "clip").unwrap_err();
        assert!(matches!(err, WhisperBatchError::UnsupportedFormat(_)));
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_convert_file_uses_transcript_stem() {
        let temp = TempDir::new().unwrap();
        let transcript = temp.child("lecture 01.json");
        transcript
            .write_str(r#"{"speakers": [], "chunks": [{"timestamp": [0.0, 2.5], "text": "Hello world"}], "text": "Hello world"}"#)
            .unwrap();

        let path = convert_file(transcript.path(), SubtitleFormat::Vtt, temp.path().join("subs")).unwrap();

        assert_eq!(path, temp.path().join("subs").join("lecture 01.vtt"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.500\nHello world\n\n"
        );
    }

    #[test]
    fn test_convert_file_malformed_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let transcript = temp.child("bad.json");
        transcript.write_str(r#"{"text": "missing segments"}"#).unwrap();
        let output_dir = temp.path().join("subs");

        let err = convert_file(transcript.path(), SubtitleFormat::Srt, &output_dir).unwrap_err();
        assert!(matches!(err, WhisperBatchError::MalformedTranscript(_)));
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_convert_output_dir_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.child("subs");
        blocker.write_str("not a directory").unwrap();

        let err = convert(&hi_bye(), SubtitleFormat::Srt, blocker.path(), "talk").unwrap_err();
        assert!(matches!(err, WhisperBatchError::Io(_)));
        blocker.assert("not a directory");
    }

    #[test]
    fn test_failed_persist_leaves_no_partial_output() {
        let temp = TempDir::new().unwrap();
        let earlier = convert(&hi_bye(), SubtitleFormat::Txt, temp.path(), "clip").unwrap();

        // A non-empty directory at the target path cannot be replaced by a rename
        temp.child("clip.srt/keep").write_str("x").unwrap();

        let err = convert(&hi_bye(), SubtitleFormat::Srt, temp.path(), "clip").unwrap_err();
        assert!(matches!(err, WhisperBatchError::Io(_)));

        let mut entries: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["clip.srt", "clip.txt"]);
        assert_eq!(std::fs::read_to_string(earlier).unwrap(), "Hi\nBye\n");
        temp.child("clip.srt/keep").assert("x");
    }
}
