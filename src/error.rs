//! Error types for the papercast library.

use std::io;
use thiserror::Error;

/// Result type alias for papercast operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The declared format tag is not one of the supported formats.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The document is encrypted and cannot be processed.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error reading the DOCX container or its XML parts.
    #[error("DOCX parsing error: {0}")]
    DocxParse(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error extracting an embedded image.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error preparing an image for the captioning service.
    #[error("Image encoding error: {0}")]
    ImageEncode(String),

    /// Transport-level failure talking to an external service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An external service answered with a non-success status.
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// An external service answered with a payload we could not use.
    #[error("Unexpected service response: {0}")]
    ServiceResponse(String),

    /// Missing or invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::DocxParse(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::DocxParse(err.to_string())
    }
}
