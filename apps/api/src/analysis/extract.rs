//! Document text extraction for PDF, DOCX, and legacy DOC uploads.
//!
//! `TextExtractor` is a trait so handlers can be driven with canned text in
//! tests; `DocumentExtractor` is the production implementation.

use std::io::{Cursor, Read};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::analysis::upload::{AcceptedUpload, DocumentKind, MAX_UPLOAD_BYTES};
use crate::errors::AppError;

/// Shortest printable run kept when scraping legacy `.doc` binaries.
const MIN_DOC_RUN: usize = 4;
/// Ceiling on decompressed document XML and on extracted text. A small
/// upload must not inflate past this.
pub const MAX_EXTRACTED_BYTES: usize = 4 * MAX_UPLOAD_BYTES;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parse failed: {0}")]
    Pdf(String),

    #[error("DOCX parse failed: {0}")]
    Docx(String),
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError>;
}

pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
        match kind {
            DocumentKind::Pdf => {
                let text = pdf_extract::extract_text_from_mem(bytes)
                    .map_err(|e| ExtractionError::Pdf(format!("{e:?}")))?;
                if text.len() > MAX_EXTRACTED_BYTES {
                    return Err(ExtractionError::Pdf(format!(
                        "extracted text exceeds {MAX_EXTRACTED_BYTES} bytes"
                    )));
                }
                Ok(text)
            }
            DocumentKind::Docx => extract_docx(bytes, MAX_EXTRACTED_BYTES),
            DocumentKind::Doc => Ok(extract_legacy_doc(bytes)),
        }
    }
}

/// Runs extraction on the blocking pool. A document that cannot be parsed
/// yields empty text, which the rubric reports as an extraction failure.
pub async fn extract_text(
    extractor: Arc<dyn TextExtractor>,
    upload: &AcceptedUpload,
) -> Result<String, AppError> {
    let kind = upload.kind;
    let bytes = upload.bytes.clone();
    let file_name = upload.file_name.clone();

    let outcome = tokio::task::spawn_blocking(move || extractor.extract(kind, &bytes)).await;

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!(%file_name, "Text extraction failed: {e}");
            Ok(String::new())
        }
        Err(join_err) if join_err.is_panic() => {
            warn!(%file_name, "Text extraction panicked on malformed document");
            Ok(String::new())
        }
        Err(join_err) => Err(AppError::Internal(anyhow::anyhow!(
            "Extraction task failed: {join_err}"
        ))),
    }
}

static PARAGRAPH_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("valid regex"));
static TAB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:tab\s*/>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Reads `word/document.xml`, refusing entries that inflate past `limit`.
/// The declared size is checked first, then the read itself is capped since
/// the header can lie.
fn extract_docx(bytes: &[u8], limit: usize) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let document = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let too_large = || ExtractionError::Docx(format!("document.xml exceeds {limit} bytes"));
    if document.size() > limit as u64 {
        return Err(too_large());
    }

    let mut xml = String::new();
    document
        .take(limit as u64 + 1)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    if xml.len() > limit {
        return Err(too_large());
    }
    Ok(docx_xml_to_text(&xml))
}

/// Flattens WordprocessingML to plain text, one paragraph per line.
fn docx_xml_to_text(xml: &str) -> String {
    let text = PARAGRAPH_END_RE.replace_all(xml, "\n");
    let text = TAB_RE.replace_all(&text, "\t");
    let text = TAG_RE.replace_all(&text, "");
    decode_xml_entities(&text)
}

fn decode_xml_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Best-effort scrape of a binary Word 97-2003 file. Text is stored either
/// as 8-bit or UTF-16LE runs; both are scanned and the richer result wins.
fn extract_legacy_doc(bytes: &[u8]) -> String {
    let narrow = printable_runs(bytes.iter().map(|b| *b as char));
    let wide = printable_runs(
        bytes
            .chunks_exact(2)
            .map(|pair| if pair[1] == 0 { pair[0] as char } else { '\0' }),
    );
    if wide.split_whitespace().count() > narrow.split_whitespace().count() {
        wide
    } else {
        narrow
    }
}

fn printable_runs(chars: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    let mut run = String::new();
    for c in chars {
        if c == '\r' || c == '\n' || c == '\t' || (' '..='~').contains(&c) {
            run.push(if c == '\r' { '\n' } else { c });
        } else {
            if run.trim().len() >= MIN_DOC_RUN {
                out.push_str(run.trim());
                out.push('\n');
            }
            run.clear();
        }
    }
    if run.trim().len() >= MIN_DOC_RUN {
        out.push_str(run.trim());
        out.push('\n');
    }
    out
}
