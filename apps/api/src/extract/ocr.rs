//! OCR for image uploads.
//!
//! `TesseractCli` runs the `tesseract` binary once per image. Nothing is kept
//! between calls, so concurrent requests never share engine state.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to stage image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to launch OCR engine '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("OCR engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("OCR timed out after {0:?}")]
    Timeout(Duration),
}

/// Recognizes text in an image. Carried in `TextExtractor` as `Arc<dyn OcrEngine>`.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

pub struct TesseractCli {
    command: String,
    language: String,
    timeout: Duration,
}

impl TesseractCli {
    /// English recognition with the given executable and per-image timeout.
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            language: "eng".to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractCli {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        // Tesseract sniffs the image format from content, so no extension is needed.
        let staged = tempfile::NamedTempFile::new()?;
        tokio::fs::write(staged.path(), image).await?;

        let child = Command::new(&self.command)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OcrError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // On timeout the child future is dropped, which kills the process.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| OcrError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(chars = text.chars().count(), "OCR finished");
        Ok(text)
    }
}
