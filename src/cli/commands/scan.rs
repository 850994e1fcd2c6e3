//! Scan command implementation
//!
//! Reads text from the argument, a file or stdin, runs the detection engine
//! and prints the redacted text followed by the report.

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::config::{load_config, load_config_or_default, RedactorConfig};
use crate::detection::{DetectOptions, DetectionEngine, RedactionResult};
use crate::{log_scan_complete, log_scan_start};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::sync::watch;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Redacted text plus a human-readable report
    Console,
    /// Full result as pretty JSON
    Json,
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Text to scan (reads stdin when neither TEXT nor --file is given)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// Override the recognizer timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub ner_timeout_ms: Option<u64>,
}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_scan_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ Configuration error: {e}");
                return Ok(2);
            }
        };

        let (source, raw) = match self.read_input().await {
            Ok(input) => input,
            Err(e) => {
                eprintln!("❌ Failed to read input: {e}");
                return Ok(2);
            }
        };

        let text = raw.trim();
        if text.is_empty() {
            eprintln!("❌ Input text is empty");
            return Ok(2);
        }

        let engine = match DetectionEngine::from_config(&config.detection, &config.ner) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build detection engine");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let mut options = DetectOptions::default().with_cancel(shutdown_signal);
        if let Some(ms) = self.ner_timeout_ms {
            options = options.with_ner_timeout(Duration::from_millis(ms));
        }

        log_scan_start!(source, text.len());
        let started = Instant::now();
        let result = engine.detect_with_options(text, options).await;
        log_scan_complete!(result.total_entities(), result.success, started.elapsed());

        self.print(&result)?;

        Ok(if result.success { 0 } else { 5 })
    }

    async fn read_input(&self) -> anyhow::Result<(&'static str, String)> {
        if let Some(ref text) = self.text {
            return Ok(("argument", text.clone()));
        }

        if let Some(ref path) = self.file {
            let text = tokio::fs::read_to_string(path).await?;
            return Ok(("file", text));
        }

        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(("stdin", text))
    }

    fn print(&self, result: &RedactionResult) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Console => {
                println!("{}", result.redacted_text);
                print!("{}", result.format_console());
            }
            OutputFormat::Json => {
                println!("{}", result.format_json()?);
            }
        }
        Ok(())
    }
}

/// An absent default file means built-in defaults; an explicit path must exist
fn load_scan_config(config_path: &str) -> crate::domain::Result<RedactorConfig> {
    if config_path == DEFAULT_CONFIG_PATH || Path::new(config_path).exists() {
        load_config_or_default(config_path)
    } else {
        load_config(config_path)
    }
}
