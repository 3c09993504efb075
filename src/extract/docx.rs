//! DOCX extraction: ZIP container plus streaming XML.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::{Extraction, ImageUnit, TextUnit};

use super::FormatExtractor;

/// Path of the main document part inside the container.
const DOCUMENT_PART: &str = "word/document.xml";
/// Path of the main document's relationship part.
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Extractor for word-processing XML containers.
///
/// Emits one text unit per non-empty paragraph (`"Paragraph {n}"`,
/// counted 1-indexed across all paragraphs including empty ones) and one
/// image unit per relationship whose target reference names an image
/// asset. A relationship whose target cannot be read is skipped.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    _private: (),
}

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Read one entry of the container into memory.
    fn read_entry<R: Read + std::io::Seek>(
        archive: &mut ZipArchive<R>,
        name: &str,
    ) -> Result<Vec<u8>> {
        let mut entry = archive.by_name(name)?;
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Parse `word/document.xml` into labeled paragraph units.
    ///
    /// Paragraph numbering counts every `w:p` element so labels stay
    /// stable whether or not earlier paragraphs were empty.
    fn parse_paragraphs(xml: &[u8]) -> Result<Vec<TextUnit>> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut units = Vec::new();
        let mut paragraph_index = 0usize;
        let mut in_paragraph = false;
        let mut in_text = false;
        let mut current = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"p" => {
                        paragraph_index += 1;
                        in_paragraph = true;
                        current.clear();
                    }
                    b"t" if in_paragraph => in_text = true,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    // A self-closing paragraph still advances the count.
                    b"p" => paragraph_index += 1,
                    b"tab" if in_paragraph => current.push('\t'),
                    b"br" | b"cr" if in_paragraph => current.push('\n'),
                    _ => {}
                },
                Event::Text(t) if in_text => {
                    current.push_str(&t.unescape()?);
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if in_paragraph => {
                        in_paragraph = false;
                        if let Some(unit) =
                            TextUnit::trimmed(format!("Paragraph {}", paragraph_index), &current)
                        {
                            units.push(unit);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(units)
    }

    /// Collect relationship targets that reference image assets, in
    /// declaration order.
    fn parse_image_targets(xml: &[u8]) -> Result<Vec<String>> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut targets = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf)?;
            match &event {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| Error::DocxParse(e.to_string()))?;
                        if attr.key.local_name().as_ref() == b"Target" {
                            let target = attr.unescape_value()?.into_owned();
                            if target.contains("image") {
                                targets.push(target);
                            }
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(targets)
    }

    /// Resolve a relationship target against the `word/` part directory.
    fn resolve_target(target: &str) -> String {
        if let Some(absolute) = target.strip_prefix('/') {
            absolute.to_string()
        } else if let Some(relative) = target.strip_prefix("../") {
            relative.to_string()
        } else {
            format!("word/{}", target)
        }
    }
}

impl FormatExtractor for DocxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let document_xml = Self::read_entry(&mut archive, DOCUMENT_PART)
            .map_err(|e| Error::DocxParse(format!("missing {}: {}", DOCUMENT_PART, e)))?;

        let mut extraction = Extraction::new();
        extraction.text_units = Self::parse_paragraphs(&document_xml)?;

        // The relationship part is optional; a document without one simply
        // has no embedded images.
        let targets = match Self::read_entry(&mut archive, DOCUMENT_RELS_PART) {
            Ok(rels_xml) => Self::parse_image_targets(&rels_xml)?,
            Err(e) => {
                log::debug!("no readable relationship part: {}", e);
                Vec::new()
            }
        };

        for (index, target) in targets.iter().enumerate() {
            let path = Self::resolve_target(target);
            match Self::read_entry(&mut archive, &path) {
                Ok(blob) => {
                    extraction
                        .image_units
                        .push(ImageUnit::new(format!("Document Image {}", index + 1), blob));
                }
                Err(e) => {
                    log::warn!("skipping image relationship {}: {}", target, e);
                }
            }
        }

        Ok(extraction)
    }
}
