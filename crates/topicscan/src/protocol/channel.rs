//! In-process transport: each worker is a thread with its own mailbox.
//!
//! Manager-to-worker links are rendezvous channels, so a send returns only
//! once the worker has taken the message. Workers report back over one
//! unbounded channel that only the worker threads hold senders for.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, info};

use crate::error::{TransportError, WorkerError};
use crate::protocol::{Cluster, Inbox, ManagerMessage, Outbox, Transport, WorkerId, WorkerMessage};
use crate::worker::{DocumentReader, FileReader, WorkerLoop, WorkerReport};

pub struct ChannelInbox {
    receiver: Receiver<ManagerMessage>,
}

impl ChannelInbox {
    pub fn new(receiver: Receiver<ManagerMessage>) -> Self {
        Self { receiver }
    }
}

impl Inbox for ChannelInbox {
    fn recv(&mut self) -> Result<ManagerMessage, TransportError> {
        self.receiver
            .recv()
            .map_err(|_| TransportError::ManagerClosed)
    }
}

#[derive(Clone)]
pub struct ChannelOutbox {
    sender: Sender<WorkerMessage>,
}

impl ChannelOutbox {
    pub fn new(sender: Sender<WorkerMessage>) -> Self {
        Self { sender }
    }
}

impl Outbox for ChannelOutbox {
    fn send(&self, message: WorkerMessage) -> Result<(), TransportError> {
        self.sender
            .send(message)
            .map_err(|_| TransportError::ManagerClosed)
    }
}

/// Runs workers as threads of the current process.
#[derive(Debug, Clone, Default)]
pub struct ThreadTransport<R = FileReader> {
    reader: R,
}

impl ThreadTransport {
    pub fn new() -> Self {
        Self::with_reader(FileReader)
    }
}

impl<R> ThreadTransport<R> {
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> Transport for ThreadTransport<R>
where
    R: DocumentReader + Clone + Send + 'static,
{
    fn connect(&self, worker_count: usize) -> Result<Box<dyn Cluster>, TransportError> {
        let (result_sender, result_receiver) = unbounded::<WorkerMessage>();
        let mut cluster = ThreadCluster {
            outbound: Vec::with_capacity(worker_count),
            inbound: result_receiver,
            workers: Vec::with_capacity(worker_count),
        };

        for worker in 1..=worker_count {
            let (job_sender, job_receiver) = bounded::<ManagerMessage>(0);
            let inbox = ChannelInbox::new(job_receiver);
            let outbox = ChannelOutbox::new(result_sender.clone());
            let reader = self.reader.clone();

            let spawned = thread::Builder::new()
                .name(format!("topicscan-worker-{}", worker))
                .spawn(move || WorkerLoop::new(worker, inbox, outbox, reader).run());

            match spawned {
                Ok(handle) => {
                    cluster.outbound.push(Some(job_sender));
                    cluster.workers.push((worker, handle));
                }
                Err(source) => {
                    Box::new(cluster).abort();
                    return Err(TransportError::Spawn { worker, source });
                }
            }
        }

        info!("Started {} worker threads", worker_count);
        Ok(Box::new(cluster))
    }
}

pub struct ThreadCluster {
    outbound: Vec<Option<Sender<ManagerMessage>>>,
    inbound: Receiver<WorkerMessage>,
    workers: Vec<(WorkerId, JoinHandle<Result<WorkerReport, WorkerError>>)>,
}

impl ThreadCluster {
    fn close_links(&mut self) {
        for link in &mut self.outbound {
            *link = None;
        }
    }
}

impl Cluster for ThreadCluster {
    fn size(&self) -> usize {
        self.outbound.len()
    }

    fn send(&mut self, worker: WorkerId, message: ManagerMessage) -> Result<(), TransportError> {
        let link = worker
            .checked_sub(1)
            .and_then(|index| self.outbound.get(index))
            .ok_or(TransportError::UnknownWorker(worker))?;

        match link {
            Some(sender) => sender
                .send(message)
                .map_err(|_| TransportError::ChannelClosed(worker)),
            None => Err(TransportError::ChannelClosed(worker)),
        }
    }

    fn recv(&mut self) -> Option<WorkerMessage> {
        self.inbound.recv().ok()
    }

    fn shutdown(mut self: Box<Self>) -> Result<(), TransportError> {
        self.close_links();

        let mut first_error = None;
        for (worker, handle) in self.workers.drain(..) {
            let outcome = match handle.join() {
                Ok(Ok(report)) => {
                    debug!(
                        "Worker {} finished: {} classified, {} skipped",
                        worker, report.classified, report.skipped
                    );
                    Ok(())
                }
                Ok(Err(e)) => Err(TransportError::WorkerFailed {
                    worker,
                    reason: e.to_string(),
                }),
                Err(_) => Err(TransportError::WorkerPanicked(worker)),
            };

            if let Err(e) = outcome {
                error!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        info!("All worker threads have stopped");
        first_error.map_or(Ok(()), Err)
    }

    fn abort(mut self: Box<Self>) {
        self.close_links();
        for (worker, handle) in self.workers.drain(..) {
            match handle.join() {
                Ok(Ok(_)) => debug!("Worker {} stopped", worker),
                Ok(Err(e)) => debug!("Worker {} stopped: {}", worker, e),
                Err(_) => error!("Worker {} panicked", worker),
            }
        }
    }
}
