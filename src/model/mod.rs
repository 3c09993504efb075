//! Core data model: extraction units, topic buckets, and pipeline results.

mod bucket;
mod report;
mod unit;

pub use bucket::{TopicBucket, TopicBuckets};
pub use report::{AudioAsset, CaptionedImage, Outcome, PipelineReport, TopicSection};
pub use unit::{Extraction, ImageUnit, TextUnit};
