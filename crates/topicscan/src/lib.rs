pub mod catalog;
pub mod categorizer;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod protocol;
pub mod sequential;
pub mod sink;
pub mod worker;

pub use catalog::{load_catalog, Catalog};
pub use categorizer::{AggregateSummary, Categorizer, ClassificationResult, TopicCount};
pub use config::{load_config, RunConfig, TransportKind};
pub use error::{
    CatalogError, CodecError, ConfigError, Phase, Result, RunError, SinkError, TopicscanError,
    TransportError, WorkerError,
};
pub use orchestrator::{Orchestrator, RunReport, SkippedDocument};
pub use protocol::{ProcessTransport, ThreadTransport, Transport};
pub use sequential::{SequentialReport, SequentialRunner};
pub use sink::{open_output, LineSink, ResultSink};
