use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Keyword hits for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// Per-topic counts for one document, one entry per catalog topic in
/// catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub document: String,
    pub counts: Vec<TopicCount>,
}

impl ClassificationResult {
    pub fn count_for(&self, topic: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|entry| entry.topic == topic)
            .map(|entry| entry.count)
    }
}

pub struct Categorizer {
    catalog: Arc<Catalog>,
}

impl Categorizer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Counts keyword hits for every topic. Topics without a hit are
    /// reported with a count of zero.
    pub fn match_counts(&self, text: &str) -> Vec<TopicCount> {
        self.catalog
            .topics()
            .map(|(topic, keywords)| TopicCount {
                topic: topic.to_string(),
                count: keywords
                    .iter()
                    .map(|keyword| count_occurrences(text, keyword))
                    .sum(),
            })
            .collect()
    }

    pub fn classify(&self, document: &str, text: &str) -> ClassificationResult {
        ClassificationResult {
            document: document.to_string(),
            counts: self.match_counts(text),
        }
    }
}

/// Counts non-overlapping occurrences of `keyword` in `text`, scanning left
/// to right and resuming after the end of each hit.
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut start = 0;
    while let Some(offset) = text[start..].find(keyword) {
        count += 1;
        start += offset + keyword.len();
    }
    count
}
