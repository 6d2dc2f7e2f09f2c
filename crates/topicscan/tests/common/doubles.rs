//! Transport and reader doubles.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use topicscan::protocol::{Cluster, ManagerMessage, WorkerId, WorkerMessage};
use topicscan::worker::{DocumentReader, FileReader};
use topicscan::{ThreadTransport, Transport, TransportError, WorkerError};

/// Thread transport that records how often workers were started.
#[derive(Clone, Default)]
pub struct CountingTransport {
    inner: ThreadTransport,
    connects: Arc<AtomicUsize>,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    fn connect(&self, worker_count: usize) -> Result<Box<dyn Cluster>, TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.inner.connect(worker_count)
    }
}

/// Thread transport whose clusters replace the broadcast catalog bytes.
pub struct CorruptingTransport {
    inner: ThreadTransport,
    replacement: Vec<u8>,
}

impl CorruptingTransport {
    pub fn new(replacement: &[u8]) -> Self {
        Self {
            inner: ThreadTransport::new(),
            replacement: replacement.to_vec(),
        }
    }
}

impl Transport for CorruptingTransport {
    fn connect(&self, worker_count: usize) -> Result<Box<dyn Cluster>, TransportError> {
        Ok(Box::new(CorruptingCluster {
            inner: self.inner.connect(worker_count)?,
            replacement: self.replacement.clone(),
        }))
    }
}

struct CorruptingCluster {
    inner: Box<dyn Cluster>,
    replacement: Vec<u8>,
}

impl Cluster for CorruptingCluster {
    fn size(&self) -> usize {
        self.inner.size()
    }

    fn send(&mut self, worker: WorkerId, message: ManagerMessage) -> Result<(), TransportError> {
        let message = match message {
            ManagerMessage::Catalog { .. } => ManagerMessage::Catalog {
                encoded: self.replacement.clone(),
            },
            other => other,
        };
        self.inner.send(worker, message)
    }

    fn recv(&mut self) -> Option<WorkerMessage> {
        self.inner.recv()
    }

    fn shutdown(self: Box<Self>) -> Result<(), TransportError> {
        self.inner.shutdown()
    }

    fn abort(self: Box<Self>) {
        self.inner.abort()
    }
}

/// Reads from disk except for documents whose path ends with `failing`.
#[derive(Debug, Clone)]
pub struct FlakyReader {
    failing: String,
}

impl FlakyReader {
    pub fn failing_on(name: &str) -> Self {
        Self {
            failing: name.to_string(),
        }
    }
}

impl DocumentReader for FlakyReader {
    fn read(&self, document: &str) -> Result<String, WorkerError> {
        if document.ends_with(&self.failing) {
            return Err(WorkerError::ReadDocument {
                path: PathBuf::from(document),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "unreadable"),
            });
        }
        FileReader.read(document)
    }
}
