//! Text extraction from uploaded resume files.
//!
//! Extraction never fails: a corrupt file yields a sentinel string, which the
//! upload gate turns into a user-facing rejection.

use std::io::{Cursor, Read};
use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

pub const UNSUPPORTED_SENTINEL: &str = "[Unsupported file type]";
pub const PDF_FAILED_SENTINEL: &str = "[PDF text could not be extracted]";
pub const DOCX_FAILED_SENTINEL: &str = "[DOCX text could not be extracted]";
pub const TXT_FAILED_SENTINEL: &str = "[TXT file unreadable]";

pub fn is_sentinel(text: &str) -> bool {
    matches!(
        text,
        UNSUPPORTED_SENTINEL | PDF_FAILED_SENTINEL | DOCX_FAILED_SENTINEL | TXT_FAILED_SENTINEL
    )
}

/// Lowercased extension after the last dot, if any.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// Extracts plain text, dispatching on the file extension. Output lines are
/// trimmed with blank lines dropped.
pub fn extract_text(bytes: &[u8], file_name: &str) -> String {
    let raw = match file_extension(file_name).as_deref() {
        Some("pdf") => extract_pdf(bytes).unwrap_or_else(|e| {
            warn!("PDF extraction failed for '{file_name}': {e:#}");
            PDF_FAILED_SENTINEL.to_string()
        }),
        Some("doc" | "docx") => extract_docx(bytes).unwrap_or_else(|e| {
            warn!("DOCX extraction failed for '{file_name}': {e:#}");
            DOCX_FAILED_SENTINEL.to_string()
        }),
        Some("txt") => String::from_utf8_lossy(bytes).into_owned(),
        _ => return UNSUPPORTED_SENTINEL.to_string(),
    };

    if is_sentinel(&raw) {
        return raw;
    }
    tidy_lines(&raw)
}

fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    // The PDF parser can panic on malformed input.
    catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| anyhow::anyhow!("PDF parser panicked"))?
        .context("Failed to parse PDF")
}

/// Paragraph text from `word/document.xml`, one paragraph per line.
fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("Not a DOCX (zip) archive")?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX is missing word/document.xml")?
        .read_to_string(&mut xml)
        .context("Failed to read word/document.xml")?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().context("Malformed document.xml")? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    let paragraph = std::mem::take(&mut current);
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                current.push_str(&t.unescape().context("Bad text escape in document.xml")?)
            }
            Event::CData(t) if in_text_run => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()))
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs.join("\n"))
}
