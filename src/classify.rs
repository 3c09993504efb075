//! Topic classification over extracted text units.

use regex::RegexBuilder;

use crate::model::{TextUnit, TopicBucket, TopicBuckets};

/// Partition text units into per-topic buckets.
///
/// Matching is a case-insensitive whole-word search for the literal topic
/// string: the escaped topic must occur bounded by word boundaries, so
/// `"attention"` matches `"self-attention maps"` but `"transformers"`
/// does not match `"Transformer"`. Multi-word topics match as a single
/// phrase. A unit may land in several buckets.
///
/// Topics are trimmed and empty ones are dropped; the result keeps one
/// bucket per surviving topic in input order, including topics that
/// matched nothing. The function is pure and never fails.
pub fn classify(units: &[TextUnit], topics: &[String]) -> TopicBuckets {
    let mut buckets = TopicBuckets::new();

    for topic in topics {
        let topic = topic.trim();
        if topic.is_empty() {
            continue;
        }

        let mut bucket = TopicBucket::new(topic);

        match whole_word_pattern(topic) {
            Some(pattern) => {
                for unit in units {
                    if pattern.is_match(&unit.content) {
                        bucket.units.push(unit.clone());
                    }
                }
            }
            None => {
                log::warn!("could not build matcher for topic {:?}", topic);
            }
        }

        buckets.push(bucket);
    }

    buckets
}

/// Build the whole-word matcher for a literal topic string.
fn whole_word_pattern(topic: &str) -> Option<regex::Regex> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(topic)))
        .case_insensitive(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(label: &str, content: &str) -> TextUnit {
        TextUnit::new(label, content)
    }

    fn topics(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_whole_word_not_substring() {
        let units = vec![unit("Page 1", "Transformer models use attention.")];
        let buckets = classify(&units, &topics(&["attention", "transformers"]));

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.get("attention").unwrap().len(), 1);
        // "transformers" is not a whole-word match for "Transformer".
        assert!(buckets.get("transformers").unwrap().is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let units = vec![unit("Page 1", "ATTENTION is all you need")];
        let buckets = classify(&units, &topics(&["attention"]));
        assert_eq!(buckets.get("attention").unwrap().len(), 1);
    }

    #[test]
    fn test_multi_word_topic_matches_as_phrase() {
        let units = vec![
            unit("Page 1", "We train a neural network on graphs."),
            unit("Page 2", "The neural architecture uses a network of relays."),
        ];
        let buckets = classify(&units, &topics(&["neural network"]));

        let bucket = buckets.get("neural network").unwrap();
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.units[0].label, "Page 1");
    }

    #[test]
    fn test_one_bucket_per_topic_in_input_order() {
        let units = vec![unit("Page 1", "nothing relevant")];
        let buckets = classify(&units, &topics(&["zebra", "apple", "mango"]));

        let order: Vec<_> = buckets.iter().map(|b| b.topic.as_str()).collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
        assert!(buckets.iter().all(|b| b.is_empty()));
    }

    #[test]
    fn test_empty_topics_are_filtered() {
        let units = vec![unit("Page 1", "attention everywhere")];
        let buckets = classify(&units, &topics(&["", "  ", "attention"]));

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get("attention").unwrap().len(), 1);
    }

    #[test]
    fn test_topic_is_trimmed_but_case_preserved() {
        let units = vec![unit("Page 1", "Bayesian inference at scale")];
        let buckets = classify(&units, &topics(&["  Bayesian "]));

        assert_eq!(buckets.len(), 1);
        let bucket = buckets.iter().next().unwrap();
        assert_eq!(bucket.topic, "Bayesian");
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_unit_can_match_multiple_topics() {
        let units = vec![unit("Page 1", "attention over graphs")];
        let buckets = classify(&units, &topics(&["attention", "graphs"]));
        assert_eq!(buckets.get("attention").unwrap().len(), 1);
        assert_eq!(buckets.get("graphs").unwrap().len(), 1);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let units = vec![
            unit("Page 1", "the p.value is small"),
            unit("Page 2", "the pXvalue is small"),
        ];
        let buckets = classify(&units, &topics(&["p.value"]));

        // An unescaped "." would also match "pXvalue".
        let bucket = buckets.get("p.value").unwrap();
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.units[0].label, "Page 1");
    }

    #[test]
    fn test_bounded_by_punctuation_and_edges() {
        let units = vec![
            unit("Page 1", "attention"),
            unit("Page 2", "(attention)"),
            unit("Page 3", "self-attention"),
            unit("Page 4", "attentional"),
        ];
        let buckets = classify(&units, &topics(&["attention"]));

        let matched: Vec<_> = buckets
            .get("attention")
            .unwrap()
            .units
            .iter()
            .map(|u| u.label.as_str())
            .collect();
        assert_eq!(matched, vec!["Page 1", "Page 2", "Page 3"]);
    }

    #[test]
    fn test_no_units_yields_empty_buckets() {
        let buckets = classify(&[], &topics(&["anything"]));
        assert_eq!(buckets.len(), 1);
        assert!(buckets.get("anything").unwrap().is_empty());
    }
}
