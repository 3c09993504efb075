//! PDF extraction using lopdf.

use lopdf::{Document as LopdfDocument, Object};

use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::{Extraction, ImageUnit, TextUnit};

use super::FormatExtractor;

/// Extractor for page-structured PDF documents.
///
/// Emits one text unit per page with visible text (`"Page {n}"`,
/// 1-indexed) and one image unit per extractable image XObject
/// (`"Page {n}-Image {j}"`). A broken embedded image is skipped without
/// aborting the page or the document.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    _private: (),
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Collect references to image XObjects on a page, in resource order.
    fn page_image_refs(doc: &LopdfDocument, page_id: lopdf::ObjectId) -> Vec<lopdf::ObjectId> {
        let mut refs = Vec::new();

        let Ok(page_dict) = doc.get_dictionary(page_id) else {
            return refs;
        };
        let Ok(res) = page_dict.get(b"Resources") else {
            return refs;
        };

        let res_dict = match res {
            Object::Reference(r) => doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        };

        let Some(res_dict) = res_dict else {
            return refs;
        };
        let Ok(xobjects) = res_dict.get(b"XObject") else {
            return refs;
        };

        let xobj_dict = match xobjects {
            Object::Reference(r) => doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        };

        if let Some(xobj_dict) = xobj_dict {
            for (_name, obj) in xobj_dict.iter() {
                if let Ok(obj_ref) = obj.as_reference() {
                    if Self::is_image_xobject(doc, obj_ref) {
                        refs.push(obj_ref);
                    }
                }
            }
        }

        refs
    }

    /// Check whether an XObject reference points at an image stream.
    fn is_image_xobject(doc: &LopdfDocument, obj_ref: lopdf::ObjectId) -> bool {
        match doc.get_object(obj_ref) {
            Ok(Object::Stream(stream)) => stream
                .dict
                .get(b"Subtype")
                .ok()
                .and_then(|s| s.as_name_str().ok())
                .map(|s| s == "Image")
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Extract the raw data of an image XObject.
    ///
    /// DCT/JPX streams are embedded image files and pass through as-is;
    /// deflated streams are decompressed to their raw sample data. The
    /// encoding is not normalized.
    fn extract_image(doc: &LopdfDocument, obj_ref: lopdf::ObjectId) -> Result<Vec<u8>> {
        let object = doc
            .get_object(obj_ref)
            .map_err(|e| Error::ImageExtract(e.to_string()))?;

        let Object::Stream(stream) = object else {
            return Err(Error::ImageExtract("Not a stream XObject".to_string()));
        };

        let filter = stream
            .dict
            .get(b"Filter")
            .ok()
            .and_then(|f| match f {
                Object::Name(n) => std::str::from_utf8(n).ok(),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name_str().ok()),
                _ => None,
            })
            .unwrap_or("");

        let data = match filter {
            "DCTDecode" | "JPXDecode" => stream.content.clone(),
            "FlateDecode" | "LZWDecode" | "" => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            _ => stream.content.clone(),
        };

        if data.is_empty() {
            return Err(Error::ImageExtract("Empty image stream".to_string()));
        }

        Ok(data)
    }
}

impl FormatExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let mut extraction = Extraction::new();

        for (page_num, page_id) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    if let Some(unit) = TextUnit::trimmed(format!("Page {}", page_num), &text) {
                        extraction.text_units.push(unit);
                    }
                }
                Err(e) => {
                    log::warn!("failed to extract text from page {}: {}", page_num, e);
                }
            }

            for (index, obj_ref) in Self::page_image_refs(&doc, page_id).iter().enumerate() {
                match Self::extract_image(&doc, *obj_ref) {
                    Ok(image_data) => {
                        extraction.image_units.push(ImageUnit::new(
                            format!("Page {}-Image {}", page_num, index + 1),
                            image_data,
                        ));
                    }
                    Err(e) => {
                        log::warn!(
                            "skipping image {} on page {}: {}",
                            index + 1,
                            page_num,
                            e
                        );
                    }
                }
            }
        }

        Ok(extraction)
    }
}
