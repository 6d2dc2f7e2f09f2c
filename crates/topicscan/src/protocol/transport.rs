use crate::error::TransportError;
use crate::protocol::{ManagerMessage, WorkerId, WorkerMessage};

/// Worker side: messages coming from the manager. Blocks until a message
/// arrives or the manager hangs up.
pub trait Inbox {
    fn recv(&mut self) -> Result<ManagerMessage, TransportError>;
}

/// Worker side: messages going to the manager.
pub trait Outbox {
    fn send(&self, message: WorkerMessage) -> Result<(), TransportError>;
}

/// Manager side view of a running set of workers.
pub trait Cluster {
    fn size(&self) -> usize;

    /// Sends one message to `worker`, blocking until the transport accepted it.
    fn send(&mut self, worker: WorkerId, message: ManagerMessage) -> Result<(), TransportError>;

    /// One-to-all send; returns once every worker has been handed the message.
    fn broadcast(&mut self, message: ManagerMessage) -> Result<(), TransportError> {
        for worker in 1..=self.size() {
            self.send(worker, message.clone())?;
        }
        Ok(())
    }

    /// Next message from any worker. `None` once every worker has hung up.
    fn recv(&mut self) -> Option<WorkerMessage>;

    /// Closes the links to the workers and waits for all of them to exit.
    /// Fails if any worker did not exit cleanly.
    fn shutdown(self: Box<Self>) -> Result<(), TransportError>;

    /// Tears the workers down without waiting for their work.
    fn abort(self: Box<Self>);
}

/// Starts workers and hands back the manager's view of them.
pub trait Transport {
    fn connect(&self, worker_count: usize) -> Result<Box<dyn Cluster>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&self, worker_count: usize) -> Result<Box<dyn Cluster>, TransportError> {
        (**self).connect(worker_count)
    }
}
