//! Delivery subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers (many producers)
//!     → queue.rs (bounded FIFO, non-blocking try_enqueue)
//!     → dispatcher.rs (single consumer, sequential sends)
//!     → deliverer.rs (Deliverer trait)
//!     → telegram.rs (HTTP POST to the Bot API)
//!
//! On shutdown:
//!     QueueCloser::close → dispatcher drains backlog → Stopped → join
//! ```
//!
//! # Design Decisions
//! - Producers never wait: a full queue is reported to the caller immediately
//! - One dispatcher task keeps outbound calls in enqueue order
//! - No retries; a failed delivery is logged and dropped
//! - Completion is handed over through the task's JoinHandle

pub mod deliverer;
pub mod dispatcher;
pub mod queue;
pub mod telegram;

pub use deliverer::{Deliverer, DeliveryError};
pub use dispatcher::{DispatchSummary, Dispatcher, DispatcherHandle, DispatcherState};
pub use queue::{EnqueueError, QueueCloser, QueueConsumer, QueueProducer};
pub use telegram::TelegramClient;
