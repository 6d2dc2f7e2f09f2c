//! Message types exchanged between the manager and its workers.

use serde::{Deserialize, Serialize};

use crate::categorizer::ClassificationResult;

/// Worker index, starting at 1. The manager itself has no id.
pub type WorkerId = usize;

/// Sent by the manager, in this order: one `Catalog`, one `AssignmentSize`,
/// then exactly that many `Document` messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagerMessage {
    /// Catalog in the flat encoding of [`crate::catalog::codec`].
    Catalog { encoded: Vec<u8> },
    AssignmentSize { count: usize },
    Document { id: String },
}

impl ManagerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ManagerMessage::Catalog { .. } => "catalog",
            ManagerMessage::AssignmentSize { .. } => "assignment size",
            ManagerMessage::Document { .. } => "document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    /// The catalog was decoded; the worker waits at the barrier.
    Ready { worker: WorkerId },
    Result {
        worker: WorkerId,
        result: ClassificationResult,
    },
    /// A document could not be read and was left unclassified.
    Skipped {
        worker: WorkerId,
        document: String,
        reason: String,
    },
    /// The worker hit a fatal error and is exiting.
    Failed { worker: WorkerId, reason: String },
}

impl WorkerMessage {
    pub fn worker(&self) -> WorkerId {
        match self {
            WorkerMessage::Ready { worker }
            | WorkerMessage::Result { worker, .. }
            | WorkerMessage::Skipped { worker, .. }
            | WorkerMessage::Failed { worker, .. } => *worker,
        }
    }
}
