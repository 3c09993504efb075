//! Document format tags and detection.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported document formats.
///
/// A format is always declared (or detected) before extraction; there is
/// no "unknown" variant, so an unrecognized tag surfaces as
/// [`Error::UnsupportedFormat`] at the parse boundary instead of silently
/// producing an empty extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    /// Page-structured PDF document.
    Pdf,
    /// Word-processing XML container (OOXML).
    Docx,
    /// Raw text, windowed into fixed line ranges.
    PlainText,
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// ZIP local file header, the outer shell of a DOCX container.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

impl DocumentFormat {
    /// Parse a format tag.
    ///
    /// Accepts the short tags (`pdf`, `docx`, `plain-text`) as well as the
    /// MIME names browsers report for uploads.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pdf" | "application/pdf" => Ok(Self::Pdf),
            "docx"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Ok(Self::Docx)
            }
            "plain-text" | "txt" | "text" | "text/plain" => Ok(Self::PlainText),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    /// The canonical short tag for this format.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "plain-text",
        }
    }

    /// The MIME type this format is declared with.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::PlainText => "text/plain",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Detect the format from a file extension.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocumentFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => Ok(DocumentFormat::Pdf),
        Some("docx") => Ok(DocumentFormat::Docx),
        Some("txt") | Some("text") | Some("md") => Ok(DocumentFormat::PlainText),
        other => Err(Error::UnsupportedFormat(
            other.unwrap_or("<no extension>").to_string(),
        )),
    }
}

/// Detect the format from leading magic bytes.
///
/// DOCX is recognized by its ZIP shell; anything that is neither PDF nor
/// ZIP is treated as plain text, which matches how fetched papers without
/// a declared type are handled.
pub fn detect_format_from_bytes(data: &[u8]) -> DocumentFormat {
    if data.starts_with(PDF_MAGIC) {
        DocumentFormat::Pdf
    } else if data.starts_with(ZIP_MAGIC) {
        DocumentFormat::Docx
    } else {
        DocumentFormat::PlainText
    }
}

/// Check if bytes carry a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_tags() {
        assert_eq!(DocumentFormat::parse("pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::parse("docx").unwrap(), DocumentFormat::Docx);
        assert_eq!(
            DocumentFormat::parse("plain-text").unwrap(),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn test_parse_mime_tags() {
        assert_eq!(
            DocumentFormat::parse("application/pdf").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::parse(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )
            .unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::parse("text/plain").unwrap(),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn test_parse_unrecognized_tag() {
        let result = DocumentFormat::parse("application/epub+zip");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::parse("  PDF ").unwrap(),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_detect_from_path() {
        assert_eq!(
            detect_format_from_path("paper.pdf").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            detect_format_from_path("notes.DOCX").unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            detect_format_from_path("readme.txt").unwrap(),
            DocumentFormat::PlainText
        );
        assert!(detect_format_from_path("archive.epub").is_err());
        assert!(detect_format_from_path("no_extension").is_err());
    }

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(
            detect_format_from_bytes(b"%PDF-1.7\n"),
            DocumentFormat::Pdf
        );
        assert_eq!(
            detect_format_from_bytes(b"PK\x03\x04rest-of-zip"),
            DocumentFormat::Docx
        );
        assert_eq!(
            detect_format_from_bytes(b"Just some text"),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
