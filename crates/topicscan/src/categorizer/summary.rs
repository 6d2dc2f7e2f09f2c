use std::collections::BTreeMap;

use crate::categorizer::{ClassificationResult, TopicCount};

/// Picks the dominant topic from counts given in catalog order.
///
/// A topic wins only if its count is strictly greater than the best count
/// seen so far, starting from zero. On a tie the earlier topic keeps the
/// lead; if no topic has a hit there is no dominant topic.
pub fn dominant_topic(counts: &[TopicCount]) -> Option<&str> {
    let mut best: Option<&str> = None;
    let mut max_count = 0;

    for entry in counts {
        if entry.count > max_count {
            max_count = entry.count;
            best = Some(entry.topic.as_str());
        }
    }

    best
}

/// Dominant topic per document, built by the manager after all results
/// of a sequential run are in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    entries: BTreeMap<String, Option<String>>,
}

impl AggregateSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationResult>,
    {
        let entries = results
            .into_iter()
            .map(|result| {
                (
                    result.document.clone(),
                    dominant_topic(&result.counts).map(str::to_string),
                )
            })
            .collect();
        Self { entries }
    }

    /// `None` if the document is unknown, `Some(None)` if it matched nothing.
    pub fn get(&self, document: &str) -> Option<Option<&str>> {
        self.entries.get(document).map(|topic| topic.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(document, topic)| (document.as_str(), topic.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
