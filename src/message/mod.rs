//! Outbound message model and text formatting.
//!
//! # Data Flow
//! ```text
//! (sender, body, requested mode)
//!     → format.rs (resolve render mode, prefix sender)
//!     → types.rs (OutboundMessage, one per destination)
//!     → delivery queue
//! ```

pub mod format;
pub mod types;

pub use format::format_message;
pub use types::{OutboundMessage, RenderMode};
