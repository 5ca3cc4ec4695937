//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Queue → Dispatcher task → HTTP server
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (once)
//!
//! Shutdown (startup.rs, after the server returns):
//!     Stop accepting → in-flight requests finish → close queue
//!     → dispatcher drains backlog → join → exit
//! ```
//!
//! # Design Decisions
//! - The queue is closed only after the server has stopped, so no producer
//!   can observe a closed queue during normal operation
//! - In-progress outbound calls are never cancelled

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::TerminationSignals;
pub use startup::{run, RelayError};
