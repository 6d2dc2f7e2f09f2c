use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::worker::DEFAULT_EXTENSIONS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Catalog source file, one `Topic@%kw1,kw2` line per topic.
    pub catalog_path: PathBuf,
    pub input_directory: PathBuf,
    /// Destination of the result lines.
    pub output_path: PathBuf,
    pub worker_count: usize,
    /// Allowed document extensions, including the leading dot.
    pub extensions: Vec<String>,
    pub transport: TransportKind,
    /// Start from an empty output file instead of appending to it.
    pub truncate_output: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("catalog.txt"),
            input_directory: PathBuf::from("sample_documents"),
            output_path: PathBuf::from("classification_results.txt"),
            worker_count: default_worker_count(),
            extensions: default_extensions(),
            transport: TransportKind::default(),
            truncate_output: false,
        }
    }
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// How workers are run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Threads of the manager process, connected by channels.
    #[default]
    Threads,
    /// Child processes of the manager, connected by stdio pipes.
    Processes,
}
