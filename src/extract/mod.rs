//! Format extraction: documents in, ordered labeled units out.
//!
//! Each supported format has its own [`FormatExtractor`]; the
//! [`ExtractorRegistry`] dispatches on the declared [`DocumentFormat`].
//!
//! # Example
//!
//! ```no_run
//! use papercast::extract::extract;
//! use papercast::DocumentFormat;
//!
//! fn main() -> papercast::Result<()> {
//!     let data = std::fs::read("paper.pdf")?;
//!     let extraction = extract(&data, DocumentFormat::Pdf)?;
//!     for unit in &extraction.text_units {
//!         println!("{}: {} chars", unit.label, unit.content.len());
//!     }
//!     Ok(())
//! }
//! ```

mod docx;
mod pdf;
mod text;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

use std::collections::HashMap;
use std::sync::Arc;

use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::Extraction;

/// Trait for format extractors.
///
/// Implement this trait to add support for a new document format.
/// Extractors must preserve document order (page/paragraph sequence, then
/// within-page image sequence) and must skip individually broken embedded
/// assets rather than aborting the document.
pub trait FormatExtractor: Send + Sync {
    /// The format this extractor handles.
    fn format(&self) -> DocumentFormat;

    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Extract text and image units from raw document bytes.
    fn extract(&self, data: &[u8]) -> Result<Extraction>;
}

/// Registry for format extractors.
///
/// Maps formats to extractors and dispatches extraction on the declared
/// format tag.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Arc<dyn FormatExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Create a registry with the built-in extractors (PDF, DOCX, plain text).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExtractor::new()));
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry
    }

    /// Register an extractor for its declared format.
    pub fn register(&mut self, extractor: Arc<dyn FormatExtractor>) {
        self.extractors.insert(extractor.format(), extractor);
    }

    /// Get the extractor for a format.
    pub fn get(&self, format: DocumentFormat) -> Option<Arc<dyn FormatExtractor>> {
        self.extractors.get(&format).cloned()
    }

    /// Check if a format is supported.
    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.extractors.contains_key(&format)
    }

    /// Extract using the registered extractor for the format.
    pub fn extract(&self, data: &[u8], format: DocumentFormat) -> Result<Extraction> {
        let extractor = self
            .get(format)
            .ok_or_else(|| Error::UnsupportedFormat(format.tag().to_string()))?;

        log::debug!("extracting {} bytes as {}", data.len(), format);
        extractor.extract(data)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Extract text and image units using the built-in extractors.
pub fn extract(data: &[u8], format: DocumentFormat) -> Result<Extraction> {
    ExtractorRegistry::with_defaults().extract(data, format)
}
