//! Synthesis orchestration: delegate summary generation per scope.

use futures::future::join_all;

use crate::error::Result;
use crate::model::{Outcome, TextUnit, TopicBuckets};
use crate::services::Summarizer;

/// System instruction for every synthesis request.
pub const SUMMARY_INSTRUCTION: &str = "You summarize research content clearly and accurately.";

/// Concatenate unit contents in document order with a blank-line separator.
fn build_context(units: &[TextUnit]) -> String {
    units
        .iter()
        .map(|unit| unit.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Synthesize one summary over a sequence of text units.
///
/// The whole concatenated context goes to the service in one request;
/// input-size limits are the service's concern, not this layer's.
pub async fn synthesize_units(summarizer: &dyn Summarizer, units: &[TextUnit]) -> Result<String> {
    let context = build_context(units);
    let prompt = format!("Summarize the following:\n{}", context);
    summarizer.summarize(SUMMARY_INSTRUCTION, &prompt).await
}

/// Synthesize the whole-document summary.
pub async fn synthesize_document(
    summarizer: &dyn Summarizer,
    units: &[TextUnit],
) -> Result<String> {
    synthesize_units(summarizer, units).await
}

/// Synthesize one summary per non-empty topic bucket.
///
/// Topics whose bucket is empty are excluded from the output entirely.
/// Calls run as a concurrent fan-out; each topic's failure is captured as
/// its own [`Outcome::Failed`] and never aborts sibling syntheses. Output
/// order follows bucket (topic input) order.
pub async fn synthesize_topics(
    summarizer: &dyn Summarizer,
    buckets: &TopicBuckets,
) -> Vec<(String, Outcome<String>)> {
    let tasks = buckets.non_empty().map(|bucket| async move {
        let result = synthesize_units(summarizer, &bucket.units).await;
        (bucket.topic.clone(), Outcome::from_result(result))
    });

    join_all(tasks).await
}
