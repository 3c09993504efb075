//! Labeled text and image units produced by extraction.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A labeled span of extracted document text.
///
/// The label is a human-readable locator (`"Page 3"`, `"Paragraph 12"`,
/// `"Lines 41-80"`); the content is non-empty, trimmed, and NFC-normalized.
/// Units keep document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Human-readable source locator
    pub label: String,

    /// Trimmed, non-empty text content
    pub content: String,
}

impl TextUnit {
    /// Create a unit from already-cleaned content.
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }

    /// Create a unit from raw extracted text.
    ///
    /// Trims and NFC-normalizes the text; returns `None` when nothing
    /// remains, so callers can filter empty pages/paragraphs/windows in
    /// one step.
    pub fn trimmed(label: impl Into<String>, raw: &str) -> Option<Self> {
        let content: String = raw.trim().nfc().collect();
        if content.is_empty() {
            None
        } else {
            Some(Self {
                label: label.into(),
                content,
            })
        }
    }
}

/// A labeled raw image blob extracted from a document.
///
/// The bytes stay in whatever encoding the source embeds (JPEG streams
/// from PDFs, PNGs from DOCX media parts, raw pixel data for filters we
/// pass through untouched). Binary data is skipped during serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUnit {
    /// Human-readable source locator (page/paragraph plus index)
    pub label: String,

    /// Raw encoded image data
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
}

impl ImageUnit {
    /// Create a new image unit.
    pub fn new(label: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }

    /// Size of the raw data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Detect the MIME type from magic bytes, if recognizable.
    pub fn mime_type(&self) -> Option<&'static str> {
        let data = &self.data;
        if data.len() < 8 {
            return None;
        }

        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("image/tiff");
        }
        if data.starts_with(b"BM") {
            return Some("image/bmp");
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }
        if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
            return Some("image/jp2");
        }

        None
    }

    /// File extension matching the sniffed MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type() {
            Some("image/jpeg") => "jpg",
            Some("image/png") => "png",
            Some("image/gif") => "gif",
            Some("image/tiff") => "tiff",
            Some("image/bmp") => "bmp",
            Some("image/webp") => "webp",
            Some("image/jp2") => "jp2",
            _ => "bin",
        }
    }
}

/// The ordered product of one extraction pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    /// Text units in document order
    pub text_units: Vec<TextUnit>,

    /// Image units in document order
    pub image_units: Vec<ImageUnit>,
}

impl Extraction {
    /// Create an empty extraction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether nothing was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.text_units.is_empty() && self.image_units.is_empty()
    }

    /// Full text content with a blank-line separator, in document order.
    pub fn plain_text(&self) -> String {
        self.text_units
            .iter()
            .map(|unit| unit.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
