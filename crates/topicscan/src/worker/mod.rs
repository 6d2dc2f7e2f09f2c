pub mod partition;
pub mod reader;
pub mod scanner;
pub mod worker_loop;

pub use partition::{partition, WorkAssignment};
pub use reader::{document_name, DocumentReader, FileReader};
pub use scanner::{DirectoryScanner, DEFAULT_EXTENSIONS};
pub use worker_loop::{WorkerLoop, WorkerReport};
