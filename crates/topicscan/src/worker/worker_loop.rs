use std::sync::Arc;

use log::{debug, error, info, warn};
use tracing::info_span;

use crate::catalog::decode;
use crate::categorizer::Categorizer;
use crate::error::WorkerError;
use crate::protocol::{Inbox, ManagerMessage, Outbox, WorkerId, WorkerMessage};
use crate::sink::{FunnelSink, ResultSink};
use crate::worker::reader::{document_name, DocumentReader};

/// What one worker did during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: WorkerId,
    pub classified: usize,
    pub skipped: usize,
}

/// The worker role: decode the replicated catalog, wait at the barrier,
/// then classify every document of the assignment.
///
/// Results go to the manager through a [`FunnelSink`]; the worker never
/// writes to the output destination itself. No completion message is sent,
/// the manager observes the end of the worker through the transport.
pub struct WorkerLoop<I, O, R> {
    worker: WorkerId,
    inbox: I,
    outbox: O,
    reader: R,
}

impl<I, O, R> WorkerLoop<I, O, R>
where
    I: Inbox,
    O: Outbox,
    R: DocumentReader,
{
    pub fn new(worker: WorkerId, inbox: I, outbox: O, reader: R) -> Self {
        Self {
            worker,
            inbox,
            outbox,
            reader,
        }
    }

    pub fn run(self) -> Result<WorkerReport, WorkerError> {
        let WorkerLoop {
            worker,
            mut inbox,
            outbox,
            reader,
        } = self;
        let _span = info_span!("worker", worker).entered();

        let mut report = WorkerReport {
            worker,
            ..Default::default()
        };

        match serve(worker, &mut inbox, &outbox, &reader, &mut report) {
            Ok(()) => {
                info!(
                    "Worker {} done: {} classified, {} skipped",
                    worker, report.classified, report.skipped
                );
                Ok(report)
            }
            Err(e) => {
                error!("Worker {} aborting: {}", worker, e);
                // The manager may already be gone; nothing left to tell then.
                let _ = outbox.send(WorkerMessage::Failed {
                    worker,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

fn serve<I, O, R>(
    worker: WorkerId,
    inbox: &mut I,
    outbox: &O,
    reader: &R,
    report: &mut WorkerReport,
) -> Result<(), WorkerError>
where
    I: Inbox,
    O: Outbox,
    R: DocumentReader,
{
    let catalog = match inbox.recv()? {
        ManagerMessage::Catalog { encoded } => decode(&encoded)?,
        other => {
            return Err(WorkerError::Protocol {
                expected: "catalog",
                got: other.kind().to_string(),
            })
        }
    };
    debug!("Worker {} holds a catalog of {} topics", worker, catalog.len());
    let categorizer = Categorizer::new(Arc::new(catalog));

    outbox.send(WorkerMessage::Ready { worker })?;

    let count = match inbox.recv()? {
        ManagerMessage::AssignmentSize { count } => count,
        other => {
            return Err(WorkerError::Protocol {
                expected: "assignment size",
                got: other.kind().to_string(),
            })
        }
    };
    info!("Worker {} assigned {} documents", worker, count);

    let mut sink = FunnelSink::new(worker, outbox);
    for _ in 0..count {
        let document = match inbox.recv()? {
            ManagerMessage::Document { id } => id,
            other => {
                return Err(WorkerError::Protocol {
                    expected: "document",
                    got: other.kind().to_string(),
                })
            }
        };

        let text = match reader.read(&document) {
            Ok(text) => text,
            Err(e) => {
                warn!("Worker {} skipping '{}': {}", worker, document, e);
                outbox.send(WorkerMessage::Skipped {
                    worker,
                    document,
                    reason: e.to_string(),
                })?;
                report.skipped += 1;
                continue;
            }
        };

        let result = categorizer.classify(&document_name(&document), &text);
        debug!("Worker {} classified '{}'", worker, result.document);
        sink.append(&result)?;
        report.classified += 1;
    }

    Ok(())
}
