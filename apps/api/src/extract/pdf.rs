use tracing::warn;

use super::ExtractError;

/// Extracts the concatenated text layer of an in-memory PDF.
/// Scanned PDFs without a text layer yield an empty (or whitespace) string.
pub fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        warn!("PDF has no extractable text layer");
    }

    Ok(text)
}
