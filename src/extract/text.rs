//! Plain-text extraction: fixed line windows.

use crate::detect::DocumentFormat;
use crate::error::Result;
use crate::model::{Extraction, TextUnit};

use super::FormatExtractor;

/// Lines per window.
const WINDOW_LINES: usize = 40;

/// Extractor for raw text documents.
///
/// Decodes bytes as UTF-8 (lossily), groups lines into fixed windows of
/// forty, and labels each window `"Lines {start}-{end}"` with 1-indexed
/// inclusive line numbers. The end label always marks the window
/// boundary (`start + 39`), even when the final window is truncated by
/// end of file. Plain text carries no images.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor {
    _private: (),
}

impl PlainTextExtractor {
    /// Create a new plain-text extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl FormatExtractor for PlainTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::PlainText
    }

    fn name(&self) -> &str {
        "plain-text"
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let text = String::from_utf8_lossy(data);
        let lines: Vec<&str> = text.lines().collect();

        let mut extraction = Extraction::new();

        for (window_index, window) in lines.chunks(WINDOW_LINES).enumerate() {
            let start = window_index * WINDOW_LINES + 1;
            let end = start + WINDOW_LINES - 1;
            let joined = window.join("\n");

            if let Some(unit) = TextUnit::trimmed(format!("Lines {}-{}", start, end), &joined) {
                extraction.text_units.push(unit);
            }
        }

        Ok(extraction)
    }
}
