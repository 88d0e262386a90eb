//! Text extraction: turns an uploaded document into plain text.
//!
//! Dispatch is by declared media type only:
//! - `application/pdf` → PDF text layer (`pdf-extract`)
//! - WordprocessingML → paragraph text (`docx-rs`)
//! - `image/*` → OCR through an [`OcrEngine`]
//!
//! PDF and DOCX decoding is CPU-bound and runs inside `tokio::task::spawn_blocking`.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub mod docx;
pub mod ocr;
pub mod pdf;

pub use docx::DocxError;
pub use ocr::{OcrEngine, OcrError};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported media type '{0}'")]
    UnsupportedType(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(#[from] DocxError),

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("extraction worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// The three document families the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    Docx,
    Image,
}

impl MediaKind {
    /// Classifies a declared media type. Parameters (`; charset=...`) and
    /// ASCII case are ignored.
    pub fn from_mime(media_type: &str) -> Result<Self, ExtractError> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Ok(MediaKind::Pdf),
            DOCX_MIME => Ok(MediaKind::Docx),
            s if s.strip_prefix("image/").is_some_and(|sub| !sub.is_empty()) => {
                Ok(MediaKind::Image)
            }
            _ => Err(ExtractError::UnsupportedType(media_type.to_string())),
        }
    }
}

/// Stateless apart from the OCR engine handle; identical bytes always
/// produce identical text.
#[derive(Clone)]
pub struct TextExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    pub async fn extract(&self, data: Bytes, media_type: &str) -> Result<String, ExtractError> {
        let kind = MediaKind::from_mime(media_type)?;
        debug!(?kind, bytes = data.len(), "extracting text");

        let text = match kind {
            MediaKind::Pdf => run_blocking(move || pdf::extract_pdf_text(&data)).await?,
            MediaKind::Docx => {
                run_blocking(move || docx::extract_docx_text(&data).map_err(ExtractError::from))
                    .await?
            }
            MediaKind::Image => self.ocr.recognize(&data).await?,
        };

        debug!(?kind, chars = text.chars().count(), "extraction finished");
        Ok(text)
    }
}

// A panic inside the decoder surfaces as `ExtractError::Worker`.
async fn run_blocking<F>(f: F) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
