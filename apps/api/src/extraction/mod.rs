//! Document Text Extractor — turns an uploaded resume into plain text.
//!
//! Bytes in, text out. The format is decided once at upload time from the
//! file name and magic bytes; extraction itself never guesses.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, Table};
use thiserror::Error;
use tracing::debug;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const PDF_MAGIC: &[u8] = b"%PDF";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

const LEGACY_DOC: &str = "legacy .doc files cannot be read; save the resume as .docx or .pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document type: {0}")]
    Unsupported(String),

    #[error("Could not read {format} document: {reason}")]
    Unreadable {
        format: DocumentFormat,
        reason: String,
    },

    #[error("Document contains no extractable text")]
    Empty,
}

/// Resume formats the extractor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    /// Legacy binary Word. Recognised so it can be refused with a clear message.
    Doc,
    Pdf,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Doc => "DOC",
            DocumentFormat::Pdf => "PDF",
        };
        f.write_str(name)
    }
}

impl DocumentFormat {
    /// Detects the format from the file extension, falling back to magic bytes.
    pub fn detect(file_name: &str, data: &[u8]) -> Result<Self, ExtractionError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "docx" => Ok(DocumentFormat::Docx),
            "doc" => Ok(DocumentFormat::Doc),
            "pdf" => Ok(DocumentFormat::Pdf),
            _ if data.starts_with(ZIP_MAGIC) => Ok(DocumentFormat::Docx),
            _ if data.starts_with(PDF_MAGIC) => Ok(DocumentFormat::Pdf),
            _ if data.starts_with(OLE_MAGIC) => Ok(DocumentFormat::Doc),
            _ => Err(ExtractionError::Unsupported(format!(
                "'{file_name}' is not a DOCX or PDF file"
            ))),
        }
    }

    /// Refuses formats that are recognised but have no text extractor.
    pub fn ensure_readable(self) -> Result<Self, ExtractionError> {
        match self {
            DocumentFormat::Doc => Err(ExtractionError::Unsupported(LEGACY_DOC.to_string())),
            format => Ok(format),
        }
    }
}

/// Converts document bytes of a declared format into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, data: &[u8], format: DocumentFormat) -> Result<String, ExtractionError>;
}

/// Default extractor backed by `docx-rs` and `pdf-extract`.
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, data: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
        let text = match format {
            DocumentFormat::Docx => extract_text_from_docx(data)?,
            DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(data).map_err(|e| {
                ExtractionError::Unreadable {
                    format,
                    reason: e.to_string(),
                }
            })?,
            DocumentFormat::Doc => {
                return Err(ExtractionError::Unsupported(LEGACY_DOC.to_string()))
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::Empty);
        }
        debug!("Extracted {} chars from {format} document", text.len());
        Ok(text.to_string())
    }
}

/// Runs extraction on the blocking pool; parsing large documents is CPU-bound.
pub async fn extract_in_background(
    extractor: Arc<dyn TextExtractor>,
    data: Bytes,
    format: DocumentFormat,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extractor.extract(&data, format))
        .await
        .map_err(|e| ExtractionError::Unreadable {
            format,
            reason: format!("extraction task failed: {e}"),
        })?
}

fn extract_text_from_docx(data: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractionError::Unreadable {
        format: DocumentFormat::Docx,
        reason: e.to_string(),
    })?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
            DocumentChild::Table(t) => table_lines(t, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&paragraph.children, &mut text);
    text
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn table_lines(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    docx_rs::TableCellContent::Paragraph(p) => lines.push(paragraph_text(p)),
                    docx_rs::TableCellContent::Table(inner) => table_lines(inner, lines),
                    _ => {}
                }
            }
        }
    }
}
