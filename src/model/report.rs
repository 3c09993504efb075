//! The caller-owned result of one pipeline run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detect::DocumentFormat;
use crate::error::Error;

use super::ImageUnit;

/// Explicit per-unit result: a value, or a visible error marker.
///
/// Service and decode failures are stored at their position/key instead of
/// aborting sibling work, so a report always accounts for every unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The operation produced a value.
    Success(T),
    /// The operation failed; the marker carries the reason.
    Failed(String),
}

impl<T> Outcome<T> {
    /// Check whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrow the value, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Borrow the failure reason, if any.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failed(reason) => Some(reason.as_str()),
        }
    }

    /// Capture a library result as an outcome, stringifying the error.
    pub fn from_result(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Binary audio narration derived from one summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioAsset {
    /// Raw audio bytes
    #[serde(skip_serializing)]
    pub data: Vec<u8>,

    /// MIME type of the audio encoding
    pub media_type: String,
}

impl AudioAsset {
    /// Create a new asset.
    pub fn new(data: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            data,
            media_type: media_type.into(),
        }
    }

    /// Size of the audio data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An extracted image paired positionally with its caption outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CaptionedImage {
    /// The extracted image unit
    pub unit: ImageUnit,

    /// Caption text, or the error marker for this position
    pub caption: Outcome<String>,
}

/// Per-topic synthesis result. Only topics whose bucket matched at least
/// one unit appear in the report.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSection {
    /// Topic as supplied by the user
    pub topic: String,

    /// Number of text units that matched the topic
    pub matched: usize,

    /// Synthesized summary over the matching units
    pub summary: Outcome<String>,

    /// Narration of the summary; `None` when the summary itself failed
    pub audio: Option<Outcome<AudioAsset>>,
}

/// Everything one pipeline run produced, owned by the caller.
///
/// The `images` sequence has exactly one entry per extracted image unit,
/// in extraction order; a failed caption occupies its position as a
/// [`Outcome::Failed`] marker.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Format the document was processed as
    pub format: DocumentFormat,

    /// When the run finished
    pub generated_at: DateTime<Utc>,

    /// Number of text units extracted
    pub text_units: usize,

    /// Whole-document summary
    pub summary: Outcome<String>,

    /// Narration of the document summary; `None` when it failed
    pub summary_audio: Option<Outcome<AudioAsset>>,

    /// Per-topic syntheses, in topic input order
    pub topics: Vec<TopicSection>,

    /// Image/caption pairs, in extraction order
    pub images: Vec<CaptionedImage>,
}
