//! The manager role of a distributed run.
//!
//! Phases run strictly in order: load the catalog, connect the workers,
//! broadcast the encoded catalog and wait until every worker reports it is
//! ready, enumerate and partition the documents, dispatch each assignment,
//! then collect results until every worker has hung up. Any fatal error
//! tears the workers down and is reported with the phase it happened in.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tracing::info_span;
use uuid::Uuid;

use crate::catalog::{encode, load_catalog, Catalog};
use crate::config::RunConfig;
use crate::error::{Phase, RunError, TopicscanError, TransportError};
use crate::protocol::{Cluster, ManagerMessage, Transport, WorkerMessage};
use crate::sink::ResultSink;
use crate::worker::{partition, DirectoryScanner, WorkAssignment};

/// A document that could not be read and was left unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub document: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub worker_count: usize,
    /// Documents per worker, index 0 being worker 1.
    pub assignment_sizes: Vec<usize>,
    pub documents_dispatched: usize,
    pub documents_classified: usize,
    pub skipped: Vec<SkippedDocument>,
    pub elapsed: Duration,
}

pub struct Orchestrator<T> {
    config: RunConfig,
    transport: T,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(config: RunConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn run<S: ResultSink>(&self, sink: &mut S) -> Result<RunReport, RunError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let worker_count = self.config.worker_count;
        let _run_span = info_span!("run", run_id = %run_id, workers = worker_count).entered();
        info!("Starting run {} with {} workers", run_id, worker_count);

        // Nothing may reach a worker before the catalog is known to be good.
        let catalog = {
            let _span = info_span!("catalog_load").entered();
            load_catalog(&self.config.catalog_path)
                .map_err(|e| RunError::new(Phase::CatalogLoad, e))?
        };

        let mut cluster = self
            .transport
            .connect(worker_count)
            .map_err(|e| RunError::new(Phase::Replication, e))?;

        if let Err(e) = replicate(cluster.as_mut(), &catalog) {
            cluster.abort();
            return Err(RunError::new(Phase::Replication, e));
        }

        let assignment_sizes = match self.dispatch(cluster.as_mut()) {
            Ok(sizes) => sizes,
            Err(e) => {
                cluster.abort();
                return Err(RunError::new(Phase::Dispatch, e));
            }
        };
        let documents_dispatched = assignment_sizes.iter().sum();

        let (documents_classified, skipped) = match collect(cluster.as_mut(), sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                cluster.abort();
                return Err(RunError::new(Phase::Classification, e));
            }
        };

        cluster
            .shutdown()
            .map_err(|e| RunError::new(Phase::Classification, e))?;

        if documents_classified + skipped.len() != documents_dispatched {
            warn!(
                "Dispatched {} documents but only {} were accounted for",
                documents_dispatched,
                documents_classified + skipped.len()
            );
        }

        let elapsed = started.elapsed();
        info!(
            "Run {} finished in {:.3}s: {} classified, {} skipped",
            run_id,
            elapsed.as_secs_f64(),
            documents_classified,
            skipped.len()
        );

        Ok(RunReport {
            run_id,
            worker_count,
            assignment_sizes,
            documents_dispatched,
            documents_classified,
            skipped,
            elapsed,
        })
    }

    fn dispatch(&self, cluster: &mut dyn Cluster) -> Result<Vec<usize>, TopicscanError> {
        let _span = info_span!("dispatch").entered();

        let scanner = DirectoryScanner::with_extensions(
            &self.config.input_directory,
            self.config.extensions.clone(),
        );
        let documents = scanner.scan()?;
        let assignments = partition(&documents, cluster.size())?;

        for assignment in &assignments {
            debug!(
                "Assigning {} documents to worker {}",
                assignment.len(),
                assignment.worker
            );
            cluster.send(
                assignment.worker,
                ManagerMessage::AssignmentSize {
                    count: assignment.len(),
                },
            )?;
            for document in &assignment.documents {
                cluster.send(
                    assignment.worker,
                    ManagerMessage::Document {
                        id: document.clone(),
                    },
                )?;
            }
        }

        info!(
            "Dispatched {} documents to {} workers",
            documents.len(),
            assignments.len()
        );
        Ok(assignments.iter().map(WorkAssignment::len).collect())
    }
}

/// Broadcasts the catalog, then blocks at the barrier until every worker
/// has acknowledged it.
fn replicate(cluster: &mut dyn Cluster, catalog: &Catalog) -> Result<(), TransportError> {
    let _span = info_span!("replication").entered();

    let encoded = encode(catalog);
    debug!("Broadcasting catalog ({} bytes)", encoded.len());
    cluster.broadcast(ManagerMessage::Catalog { encoded })?;

    let mut ready = BTreeSet::new();
    while ready.len() < cluster.size() {
        match cluster.recv() {
            Some(WorkerMessage::Ready { worker }) => {
                ready.insert(worker);
            }
            Some(WorkerMessage::Failed { worker, reason }) => {
                return Err(TransportError::WorkerFailed { worker, reason });
            }
            Some(other) => {
                return Err(TransportError::WorkerFailed {
                    worker: other.worker(),
                    reason: "sent results before the barrier".to_string(),
                });
            }
            None => return Err(TransportError::Disconnected),
        }
    }

    info!("Catalog replicated to {} workers", ready.len());
    Ok(())
}

/// Funnels worker output into the sink until every worker has hung up.
fn collect<S: ResultSink>(
    cluster: &mut dyn Cluster,
    sink: &mut S,
) -> Result<(usize, Vec<SkippedDocument>), TopicscanError> {
    let _span = info_span!("classification").entered();

    let mut classified = 0;
    let mut skipped = Vec::new();

    while let Some(message) = cluster.recv() {
        match message {
            WorkerMessage::Result { result, .. } => {
                sink.append(&result)?;
                classified += 1;
            }
            WorkerMessage::Skipped {
                worker,
                document,
                reason,
            } => {
                warn!("Worker {} could not classify '{}': {}", worker, document, reason);
                skipped.push(SkippedDocument { document, reason });
            }
            WorkerMessage::Failed { worker, reason } => {
                return Err(TransportError::WorkerFailed { worker, reason }.into());
            }
            WorkerMessage::Ready { worker } => {
                debug!("Ignoring repeated ready from worker {}", worker);
            }
        }
    }

    Ok((classified, skipped))
}
