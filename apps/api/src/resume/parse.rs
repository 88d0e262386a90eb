//! Resume parse pipeline: extract → complete → parse JSON → spam branch → validate.
//!
//! Each stage runs strictly after the previous one; the first failure ends the
//! request. The spam flag changes the payload, never the status.

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::extract::TextExtractor;
use crate::llm_client::Completer;
use crate::resume::prompts::build_parse_prompt;
use crate::resume::schema;

/// Returned in place of the record when the model flags the document.
pub const SPAM_WARNING: &str =
    "⚠️ This resume may be spam or incomplete or Valid resume required";

/// One uploaded file, alive for a single request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
    Spam,
    Record(Value),
}

pub async fn run_pipeline(
    upload: Upload,
    extractor: &TextExtractor,
    completer: &dyn Completer,
) -> Result<ParseOutcome, AppError> {
    debug!(stage = "extracting", file_name = ?upload.file_name);
    let text = extractor.extract(upload.data, &upload.media_type).await?;

    debug!(stage = "completing", chars = text.chars().count());
    let raw = completer.complete(&build_parse_prompt(&text)).await?;

    debug!(stage = "branching", response_len = raw.len());
    let mut record: Value = serde_json::from_str(&raw)?;

    if normalize_spam(&mut record) {
        debug!(stage = "responding", spam = true);
        return Ok(ParseOutcome::Spam);
    }

    schema::validate(&record).map_err(AppError::SchemaViolation)?;

    debug!(stage = "responding", spam = false);
    Ok(ParseOutcome::Record(record))
}

/// Rewrites a present `spam` field to a plain boolean and returns it.
/// An absent field, or a record that is not an object, counts as not spam.
pub fn normalize_spam(record: &mut Value) -> bool {
    match record.get_mut("spam") {
        Some(flag) => {
            let spam = is_truthy(flag);
            *flag = Value::Bool(spam);
            spam
        }
        None => false,
    }
}

fn is_truthy(flag: &Value) -> bool {
    match flag {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}
