use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::protocol::WorkerId;

#[derive(Error, Debug)]
pub enum TopicscanError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Duplicate topic '{0}'")]
    DuplicateTopic(String),

    #[error("Topic name must not be empty")]
    EmptyTopicName,

    #[error("Topic '{topic}' contains an empty keyword")]
    EmptyKeyword { topic: String },

    #[error("'{token}' contains the reserved separator '{separator}'")]
    ReservedSeparator { token: String, separator: char },
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Encoded catalog is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Encoded catalog does not end with ';'")]
    Unterminated,

    #[error("Catalog entry '{0}' has no ':' separator")]
    MissingTopicSeparator(String),

    #[error("Keyword list of topic '{0}' does not end with ','")]
    UnterminatedKeywords(String),

    #[error("Decoded catalog is invalid: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Unsupported config file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: WorkerId,
        #[source]
        source: std::io::Error,
    },

    #[error("Link to worker {0} is closed")]
    ChannelClosed(WorkerId),

    #[error("Manager link is closed")]
    ManagerClosed,

    #[error("Every worker hung up before the run finished")]
    Disconnected,

    #[error("Unknown worker {0}")]
    UnknownWorker(WorkerId),

    #[error("I/O error on worker link: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode a message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Worker {0} panicked")]
    WorkerPanicked(WorkerId),

    #[error("Worker {worker} failed: {reason}")]
    WorkerFailed { worker: WorkerId, reason: String },
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog replication failed: {0}")]
    Replication(#[from] CodecError),

    #[error("Unexpected message from manager: expected {expected}, got {got}")]
    Protocol { expected: &'static str, got: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to open result destination '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write result line: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to forward result to the manager: {0}")]
    Forward(#[from] TransportError),

    #[error("Malformed result line: {0}")]
    MalformedLine(String),
}

/// Stage of a run, used to tell the user where a fatal error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CatalogLoad,
    Replication,
    Dispatch,
    Classification,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::CatalogLoad => "catalog load",
            Phase::Replication => "replication",
            Phase::Dispatch => "dispatch",
            Phase::Classification => "classification",
        };
        f.write_str(name)
    }
}

/// A fatal error that aborted a run.
#[derive(Error, Debug)]
#[error("{phase} failed: {source}")]
pub struct RunError {
    pub phase: Phase,
    #[source]
    pub source: TopicscanError,
}

impl RunError {
    pub fn new(phase: Phase, source: impl Into<TopicscanError>) -> Self {
        Self {
            phase,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TopicscanError>;
