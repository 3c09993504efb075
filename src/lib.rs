//! # papercast
//!
//! Research-paper processing pipeline for Rust.
//!
//! papercast extracts labeled text and image units from PDF, DOCX, and
//! plain-text documents, classifies text units against user-supplied
//! topics, synthesizes natural-language summaries (whole-document and
//! per-topic) through an external text-generation service, captions
//! embedded images, and narrates summaries through a speech service.
//!
//! ## Quick Start
//!
//! ```no_run
//! use papercast::{DocumentFormat, Pipeline, ServiceOptions};
//!
//! #[tokio::main]
//! async fn main() -> papercast::Result<()> {
//!     let data = std::fs::read("paper.pdf")?;
//!     let topics = vec!["attention".to_string(), "graph networks".to_string()];
//!
//!     let pipeline = Pipeline::from_service_options(ServiceOptions::from_env()?)?;
//!     let report = pipeline.run(&data, DocumentFormat::Pdf, &topics).await?;
//!
//!     if let Some(summary) = report.summary.success() {
//!         println!("{}", summary);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The extraction and classification layers are pure and usable on their
//! own, without any service configuration:
//!
//! ```
//! use papercast::{classify, extract, DocumentFormat};
//!
//! # fn main() -> papercast::Result<()> {
//! let extraction = extract(b"Transformer models use attention.", DocumentFormat::PlainText)?;
//! let buckets = classify(&extraction.text_units, &["attention".to_string()]);
//! assert_eq!(buckets.get("attention").unwrap().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Three input formats**: page-structured PDF, DOCX containers, and
//!   windowed plain text, each preserving document order
//! - **Whole-word topic classification**: case-insensitive literal
//!   phrase matching into per-topic buckets
//! - **Failure isolation**: per-unit and per-topic service failures are
//!   stored as visible markers, never aborting sibling work
//! - **Concurrent fan-out**: captions, topic syntheses, and narration
//!   run concurrently with ordering preserved

pub mod acquire;
pub mod classify;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod services;
pub mod synthesize;

// Re-export commonly used types
pub use classify::classify;
pub use detect::{detect_format_from_bytes, detect_format_from_path, DocumentFormat};
pub use error::{Error, Result};
pub use extract::{extract, ExtractorRegistry, FormatExtractor};
pub use model::{
    AudioAsset, CaptionedImage, Extraction, ImageUnit, Outcome, PipelineReport, TextUnit,
    TopicBucket, TopicBuckets, TopicSection,
};
pub use pipeline::{Pipeline, PipelineOptions};
pub use services::{
    Captioner, ChatClient, ServiceOptions, SpeechClient, SpeechSynthesizer, Summarizer,
};
