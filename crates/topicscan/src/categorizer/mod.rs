pub mod matcher;
pub mod summary;

pub use matcher::{count_occurrences, Categorizer, ClassificationResult, TopicCount};
pub use summary::{dominant_topic, AggregateSummary};
