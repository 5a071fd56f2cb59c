//! whisper-batch - batch media transcription into subtitles
//!
//! Walks a directory of audio or video files, extracts audio with ffmpeg,
//! transcribes with insanely-fast-whisper and writes SRT, WebVTT or text.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use whisper_batch::cli::{Args, Commands};
use whisper_batch::config::Config;
use whisper_batch::media::{MediaProcessorFactory, MediaProcessorTrait};
use whisper_batch::pipeline::Pipeline;
use whisper_batch::subtitle;
use whisper_batch::transcribe::{TranscriberFactory, TranscriberTrait};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting whisper-batch");

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Batch(batch) => {
            let config = batch.apply(config);
            let pipeline = Pipeline::new(config);
            pipeline.check_dependencies().await?;

            let report = pipeline.run(&batch.input_path).await?;

            println!("Processed {} file(s)", report.processed.len());
            for path in &report.processed {
                println!("  {}", path.display());
            }
            if !report.is_success() {
                println!("Failed {} file(s)", report.failed.len());
                for (path, reason) in &report.failed {
                    println!("  {}: {}", path.display(), reason);
                }
                warn!("{} file(s) failed", report.failed.len());
            }
        }
        Commands::Convert {
            input,
            subtitle_format,
            output_dir,
        } => {
            let format = subtitle_format.unwrap_or(config.output.format);
            let output_dir = output_dir.unwrap_or(config.output.subtitle_dir);
            let path = subtitle::convert_file(&input, format, &output_dir)?;
            println!("{}", path.display());
        }
        Commands::Extract { input, output } => {
            let media = MediaProcessorFactory::create_processor(config.media);
            media.check_availability().await?;
            media.extract_audio(&input, &output).await?;
            println!("{}", output.display());
        }
        Commands::Transcribe {
            input,
            output,
            language,
        } => {
            let mut transcriber_config = config.transcriber;
            if language.is_some() {
                transcriber_config.language = language;
            }
            let transcriber = TranscriberFactory::create_default(transcriber_config);
            transcriber.transcribe(&input, &output).await?;
            println!("{}", output.display());
        }
        Commands::Config { output } => {
            Config::default().save_to_file(&output)?;
            info!("Default configuration written to {}", output.display());
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".whisper-batch").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "whisper-batch.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("whisper-batch.log").display()
    );

    Ok(())
}
