//! Upload gate for resume files: extension, content type and extracted text.

use std::io::Cursor;
use std::str::FromStr;

use anyhow::bail;

use crate::errors::AppError;
use crate::resume::extract::{file_extension, is_sentinel};

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

const ZIP_MIME: &str = "application/zip";
const WORDPROCESSING_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ALLOWED_MIME_PREFIXES: [&str; 4] = [
    "application/pdf",
    "application/msword",
    WORDPROCESSING_MIME,
    "text/plain",
];

/// How an upload's content type is determined. Chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MimeDetection {
    /// Magic bytes; NUL-free UTF-8 counts as `text/plain`.
    #[default]
    Sniff,
    /// The client-declared type, else a guess from the file name.
    Declared,
}

impl FromStr for MimeDetection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sniff" => Ok(MimeDetection::Sniff),
            "declared" => Ok(MimeDetection::Declared),
            other => bail!("MIME_DETECTION must be 'sniff' or 'declared', got '{other}'"),
        }
    }
}

pub fn detect_mime(
    detection: MimeDetection,
    bytes: &[u8],
    file_name: &str,
    declared: Option<&str>,
) -> String {
    match detection {
        MimeDetection::Sniff => {
            if let Some(kind) = infer::get(bytes) {
                // Word writes `[Content_Types].xml` first, which hides the
                // document part from a header sniff.
                if kind.mime_type() == ZIP_MIME && is_wordprocessing_archive(bytes) {
                    return WORDPROCESSING_MIME.to_string();
                }
                return kind.mime_type().to_string();
            }
            match std::str::from_utf8(bytes) {
                Ok(text) if !text.contains('\0') => "text/plain".to_string(),
                _ => "application/octet-stream".to_string(),
            }
        }
        MimeDetection::Declared => declared
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(file_name)
                    .first_or_octet_stream()
                    .to_string()
            }),
    }
}

fn is_wordprocessing_archive(bytes: &[u8]) -> bool {
    let Ok(mut archive) = zip::ZipArchive::new(Cursor::new(bytes)) else {
        return false;
    };
    let found = archive.by_name("word/document.xml").is_ok();
    found
}

/// Checks run before extraction. Returns the detected content type.
pub fn validate_upload(
    detection: MimeDetection,
    bytes: &[u8],
    file_name: &str,
    declared: Option<&str>,
) -> Result<String, AppError> {
    let allowed = file_extension(file_name)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        return Err(AppError::Validation(
            "Unsupported file type. Only .pdf, .doc, .docx, .txt allowed.".to_string(),
        ));
    }

    if bytes.is_empty() {
        return Err(AppError::Validation("Empty file".to_string()));
    }

    let mime = detect_mime(detection, bytes, file_name, declared);
    if !ALLOWED_MIME_PREFIXES.iter().any(|p| mime.starts_with(p)) {
        return Err(AppError::Validation(format!("Unsupported MIME type: {mime}")));
    }

    Ok(mime)
}

/// Check run after extraction: sentinel output, or no text from a document
/// format, means the file is unusable.
pub fn validate_extracted(file_name: &str, text: &str) -> Result<(), AppError> {
    let is_document = matches!(
        file_extension(file_name).as_deref(),
        Some("pdf" | "doc" | "docx")
    );
    if is_sentinel(text) || (is_document && text.trim().is_empty()) {
        return Err(AppError::UnprocessableEntity(
            "Could not extract text. Please upload a text-based PDF/DOCX.".to_string(),
        ));
    }
    Ok(())
}
