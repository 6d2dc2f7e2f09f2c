pub mod channel;
pub mod messages;
pub mod process;
pub mod transport;

pub use channel::{ChannelInbox, ChannelOutbox, ThreadTransport};
pub use messages::{ManagerMessage, WorkerId, WorkerMessage};
pub use process::{run_stdio_worker, ProcessTransport, StdinInbox, StdoutOutbox};
pub use transport::{Cluster, Inbox, Outbox, Transport};
