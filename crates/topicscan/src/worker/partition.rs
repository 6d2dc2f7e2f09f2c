use crate::error::WorkerError;
use crate::protocol::WorkerId;

/// The contiguous slice of documents owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkAssignment {
    pub worker: WorkerId,
    pub documents: Vec<String>,
}

impl WorkAssignment {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Splits `documents` into `worker_count` contiguous assignments for workers
/// `1..=worker_count`.
///
/// With `base = N / W` and `rem = N % W`, workers `1..=rem` receive
/// `base + 1` documents and the remaining workers `base`. The split is purely
/// positional; document content plays no part.
pub fn partition(
    documents: &[String],
    worker_count: usize,
) -> Result<Vec<WorkAssignment>, WorkerError> {
    if worker_count == 0 {
        return Err(WorkerError::NoWorkers);
    }

    let base = documents.len() / worker_count;
    let remainder = documents.len() % worker_count;

    let mut assignments = Vec::with_capacity(worker_count);
    let mut start = 0;
    for worker in 1..=worker_count {
        let size = base + usize::from(worker <= remainder);
        assignments.push(WorkAssignment {
            worker,
            documents: documents[start..start + size].to_vec(),
        });
        start += size;
    }

    Ok(assignments)
}
