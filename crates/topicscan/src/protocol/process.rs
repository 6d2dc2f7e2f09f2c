//! Child-process transport. Every worker is a separate OS process running
//! the worker entry point; messages travel as one JSON document per line
//! over the child's stdin (manager to worker) and stdout (worker to manager).
//! Worker logs go to the inherited stderr.

use std::io::{self, BufRead, BufReader, BufWriter, Lines, StdinLock, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::error::{TransportError, WorkerError};
use crate::protocol::{Cluster, Inbox, ManagerMessage, Outbox, Transport, WorkerId, WorkerMessage};
use crate::worker::{FileReader, WorkerLoop, WorkerReport};

/// Spawns `program args... --id <worker>` once per worker.
#[derive(Debug, Clone)]
pub struct ProcessTransport {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessTransport {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Re-executes the running binary with its `worker` subcommand.
    pub fn current_exe() -> Result<Self, TransportError> {
        let program = std::env::current_exe()?;
        Ok(Self::new(program, vec!["worker".to_string()]))
    }

    fn spawn(&self, worker: WorkerId) -> Result<Child, TransportError> {
        Command::new(&self.program)
            .args(&self.args)
            .arg("--id")
            .arg(worker.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| TransportError::Spawn { worker, source })
    }
}

impl Transport for ProcessTransport {
    fn connect(&self, worker_count: usize) -> Result<Box<dyn Cluster>, TransportError> {
        let (sender, inbound) = unbounded::<WorkerMessage>();
        let mut cluster = ProcessCluster {
            workers: Vec::with_capacity(worker_count),
            inbound,
        };

        for worker in 1..=worker_count {
            let mut child = match self.spawn(worker) {
                Ok(child) => child,
                Err(e) => {
                    Box::new(cluster).abort();
                    return Err(e);
                }
            };

            let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
                (Some(stdin), Some(stdout)) => (stdin, stdout),
                _ => {
                    let _ = child.kill();
                    let _ = child.wait();
                    Box::new(cluster).abort();
                    return Err(TransportError::Spawn {
                        worker,
                        source: io::Error::new(io::ErrorKind::BrokenPipe, "missing stdio pipe"),
                    });
                }
            };

            debug!("Spawned worker {} as pid {}", worker, child.id());
            let reader = spawn_reader(worker, stdout, sender.clone());
            cluster.workers.push(ChildWorker {
                worker,
                child,
                stdin: Some(BufWriter::new(stdin)),
                reader: Some(reader),
            });
        }

        info!("Started {} worker processes", worker_count);
        Ok(Box::new(cluster))
    }
}

/// Forwards every line the child writes to stdout into the shared inbound
/// channel. Ends when the child closes stdout.
fn spawn_reader(
    worker: WorkerId,
    stdout: ChildStdout,
    sender: Sender<WorkerMessage>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let message = match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => serde_json::from_str::<WorkerMessage>(&line).unwrap_or_else(|e| {
                    WorkerMessage::Failed {
                        worker,
                        reason: format!("malformed message from worker: {}", e),
                    }
                }),
                Err(e) => WorkerMessage::Failed {
                    worker,
                    reason: format!("failed to read worker output: {}", e),
                },
            };

            let failed = matches!(message, WorkerMessage::Failed { .. });
            if sender.send(message).is_err() || failed {
                break;
            }
        }
        debug!("Output of worker {} closed", worker);
    })
}

struct ChildWorker {
    worker: WorkerId,
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    reader: Option<JoinHandle<()>>,
}

impl ChildWorker {
    fn join_reader(&mut self) {
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                error!("Output reader of worker {} panicked", self.worker);
            }
        }
    }
}

pub struct ProcessCluster {
    workers: Vec<ChildWorker>,
    inbound: Receiver<WorkerMessage>,
}

impl Cluster for ProcessCluster {
    fn size(&self) -> usize {
        self.workers.len()
    }

    fn send(&mut self, worker: WorkerId, message: ManagerMessage) -> Result<(), TransportError> {
        let child = worker
            .checked_sub(1)
            .and_then(|index| self.workers.get_mut(index))
            .ok_or(TransportError::UnknownWorker(worker))?;
        let stdin = child
            .stdin
            .as_mut()
            .ok_or(TransportError::ChannelClosed(worker))?;

        serde_json::to_writer(&mut *stdin, &message)?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        Ok(())
    }

    fn recv(&mut self) -> Option<WorkerMessage> {
        self.inbound.recv().ok()
    }

    fn shutdown(mut self: Box<Self>) -> Result<(), TransportError> {
        let mut first_error = None;

        for child in &mut self.workers {
            child.stdin = None;
            let outcome = match child.child.wait() {
                Ok(status) if status.success() => {
                    debug!("Worker {} exited cleanly", child.worker);
                    Ok(())
                }
                Ok(status) => Err(TransportError::WorkerFailed {
                    worker: child.worker,
                    reason: format!("process exited with {}", status),
                }),
                Err(e) => Err(TransportError::Io(e)),
            };
            child.join_reader();

            if let Err(e) = outcome {
                error!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        info!("All worker processes have exited");
        first_error.map_or(Ok(()), Err)
    }

    fn abort(mut self: Box<Self>) {
        for child in &mut self.workers {
            child.stdin = None;
            if let Err(e) = child.child.kill() {
                debug!("Worker {} already gone: {}", child.worker, e);
            }
            if let Err(e) = child.child.wait() {
                warn!("Failed to reap worker {}: {}", child.worker, e);
            }
            child.join_reader();
        }
    }
}

/// Manager messages read from this process's stdin.
pub struct StdinInbox {
    lines: Lines<StdinLock<'static>>,
}

impl StdinInbox {
    pub fn new() -> Self {
        Self {
            lines: io::stdin().lock().lines(),
        }
    }
}

impl Default for StdinInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Inbox for StdinInbox {
    fn recv(&mut self) -> Result<ManagerMessage, TransportError> {
        loop {
            match self.lines.next() {
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(serde_json::from_str(&line)?),
                Some(Err(e)) => return Err(TransportError::Io(e)),
                None => return Err(TransportError::ManagerClosed),
            }
        }
    }
}

/// Worker messages written to this process's stdout. Each message is
/// written and flushed under the stdout lock, one line at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutbox;

impl Outbox for StdoutOutbox {
    fn send(&self, message: WorkerMessage) -> Result<(), TransportError> {
        let mut out = io::stdout().lock();
        serde_json::to_writer(&mut out, &message)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

/// Entry point of a worker process started by [`ProcessTransport`].
pub fn run_stdio_worker(worker: WorkerId) -> Result<WorkerReport, WorkerError> {
    WorkerLoop::new(worker, StdinInbox::new(), StdoutOutbox, FileReader).run()
}
