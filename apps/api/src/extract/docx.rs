//! DOCX body text.
//!
//! A `.docx` file is a ZIP archive read with `docx-rs`. Only run text is
//! kept: text runs, tabs as `\t`, breaks as `\n` and one newline per
//! paragraph. Formatting is discarded.
//!
//! The archive is inflated once through a capped reader before parsing, so
//! a small upload cannot expand into an unbounded allocation.

use std::io::{self, Cursor, Read};

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use thiserror::Error;

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the total inflated size of all archive entries.
pub const MAX_INFLATED_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to inflate archive entry: {0}")]
    Io(#[from] io::Error),

    #[error("archive inflates past {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("malformed document: {0}")]
    Read(String),
}

pub fn extract_docx_text(data: &[u8]) -> Result<String, DocxError> {
    extract_with_limit(data, MAX_INFLATED_BYTES)
}

fn extract_with_limit(data: &[u8], limit: u64) -> Result<String, DocxError> {
    check_inflated_size(data, limit)?;

    let docx = docx_rs::read_docx(data).map_err(|e| DocxError::Read(e.to_string()))?;
    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(p) = child {
            push_paragraph(p, &mut text);
        }
    }
    Ok(text)
}

/// Streams every entry through a `take` reader, failing once the running
/// total passes `limit`. Declared sizes in the central directory are not
/// trusted.
fn check_inflated_size(data: &[u8], limit: u64) -> Result<(), DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    archive.by_name(DOCUMENT_PART)?;

    let mut total: u64 = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let budget = limit - total;
        if entry.size() > budget {
            return Err(DocxError::TooLarge { limit });
        }
        total += io::copy(&mut entry.by_ref().take(budget + 1), &mut io::sink())?;
        if total > limit {
            return Err(DocxError::TooLarge { limit });
        }
    }
    Ok(())
}

fn push_paragraph(p: &Paragraph, out: &mut String) {
    push_children(&p.children, out);
    out.push('\n');
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            // Contact details are often hyperlinks.
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}
