use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use super::TranscriberTrait;
use crate::config::TranscriberConfig;
use crate::error::{Result, WhisperBatchError};

/// Runs the `insanely-fast-whisper` CLI
pub struct InsanelyFastWhisperTranscriber {
    config: TranscriberConfig,
}

impl InsanelyFastWhisperTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, audio_path: &Path, transcript_path: &Path) -> Vec<String> {
        let config = &self.config;
        let mut args = vec![
            "--file-name".to_string(),
            audio_path.to_string_lossy().to_string(),
            "--transcript-path".to_string(),
            transcript_path.to_string_lossy().to_string(),
            "--model-name".to_string(),
            config.model_name.clone(),
            "--task".to_string(),
            config.task.as_str().to_string(),
            "--timestamp".to_string(),
            config.timestamp.as_str().to_string(),
            "--device-id".to_string(),
            config.device_id.clone(),
            "--batch-size".to_string(),
            config.batch_size.to_string(),
        ];

        // Without --language the tool detects the language itself
        if let Some(language) = &config.language {
            args.push("--language".to_string());
            args.push(language.clone());
        }

        if config.flash {
            args.push("--flash".to_string());
            args.push("True".to_string());
        }

        if let Some(token) = &config.hf_token {
            args.push("--hf-token".to_string());
            args.push(token.clone());
            args.push("--diarization_model".to_string());
            args.push(config.diarization_model.clone());
        }

        args
    }
}

#[async_trait]
impl TranscriberTrait for InsanelyFastWhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path, transcript_path: &Path) -> Result<()> {
        info!("Transcribing {} with {}", audio_path.display(), self.config.model_name);

        if let Some(parent) = transcript_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // The existence check below must only see this run's output
        match tokio::fs::remove_file(transcript_path).await {
            Ok(()) => debug!("Removed previous transcript {}", transcript_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let args = self.build_args(audio_path, transcript_path);
        debug!("Executing transcriber command: {} {:?}", self.config.binary_path, args);

        let output = Command::new(&self.config.binary_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| WhisperBatchError::Transcriber(format!("Failed to execute {}: {}", self.config.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WhisperBatchError::Transcriber(format!(
                "Transcription failed: {}",
                stderr.trim()
            )));
        }

        if !transcript_path.exists() {
            return Err(WhisperBatchError::Transcriber(format!(
                "Transcriber exited without writing {}",
                transcript_path.display()
            )));
        }

        info!("Transcript written to {}", transcript_path.display());
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("--help")
            .output()
            .await
            .map_err(|e| WhisperBatchError::Transcriber(format!("Transcriber not found: {}", e)))?;

        if output.status.success() {
            info!("Transcriber is available");
            Ok(())
        } else {
            Err(WhisperBatchError::Transcriber(format!(
                "{} --help failed",
                self.config.binary_path
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Task, TimestampLevel};

    #[test]
    fn test_default_args() {
        let transcriber = InsanelyFastWhisperTranscriber::new(TranscriberConfig::default());
        let args = transcriber.build_args(Path::new("a/talk.wav"), Path::new("t/talk.json"));

        assert_eq!(
            args,
            vec![
                "--file-name", "a/talk.wav",
                "--transcript-path", "t/talk.json",
                "--model-name", "openai/whisper-large-v3",
                "--task", "transcribe",
                "--timestamp", "chunk",
                "--device-id", "0",
                "--batch-size", "24",
            ]
        );
    }

    #[test]
    fn test_optional_args() {
        let transcriber = InsanelyFastWhisperTranscriber::new(TranscriberConfig {
            task: Task::Translate,
            timestamp: TimestampLevel::Word,
            language: Some("de".to_string()),
            flash: true,
            hf_token: Some("hf_abc".to_string()),
            device_id: "mps".to_string(),
            ..TranscriberConfig::default()
        });
        let args = transcriber.build_args(Path::new("x.wav"), Path::new("x.json"));
        let joined = args.join(" ");

        assert!(joined.contains("--task translate"));
        assert!(joined.contains("--timestamp word"));
        assert!(joined.contains("--device-id mps"));
        assert!(joined.contains("--language de"));
        assert!(joined.contains("--flash True"));
        assert!(joined.ends_with("--hf-token hf_abc --diarization_model pyannote/speaker-diarization-3.1"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_previous_transcript_is_not_reused() {
        let temp = tempfile::tempdir().unwrap();
        let transcript_path = temp.path().join("x.json");
        std::fs::write(
            &transcript_path,
            r#"{"chunks":[{"timestamp":[0.0,1.0],"text":"OLD RUN"}]}"#,
        )
        .unwrap();

        // `true` exits successfully without writing anything
        let transcriber = InsanelyFastWhisperTranscriber::new(TranscriberConfig {
            binary_path: "true".to_string(),
            ..TranscriberConfig::default()
        });

        let result = transcriber.transcribe(Path::new("x.wav"), &transcript_path).await;
        assert!(matches!(result, Err(WhisperBatchError::Transcriber(_))));
        assert!(!transcript_path.exists());
    }

    #[tokio::test]
    async fn test_missing_binary_is_transcriber_error() {
        let transcriber = InsanelyFastWhisperTranscriber::new(TranscriberConfig {
            binary_path: "/nonexistent/insanely-fast-whisper".to_string(),
            ..TranscriberConfig::default()
        });
        let temp = tempfile::tempdir().unwrap();

        let result = transcriber
            .transcribe(Path::new("x.wav"), &temp.path().join("out").join("x.json"))
            .await;
        assert!(matches!(result, Err(WhisperBatchError::Transcriber(_))));
        assert!(matches!(
            transcriber.check_availability().await,
            Err(WhisperBatchError::Transcriber(_))
        ));
    }
}
