//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Rule string (at startup):
//!     "alice:111,222;999"
//!     → rules.rs (split rules, parse ids)
//!     → table.rs (merge per sender, dedup in first-seen order)
//!     → Freeze as immutable RoutingTable
//!
//! Incoming request:
//!     sender id → RoutingTable::resolve → destination ids (possibly empty)
//! ```
//!
//! # Design Decisions
//! - Table built once, shared read-only via Arc (no locks)
//! - Empty sender key is the fallback for unknown senders
//! - An explicit entry with no ids does not fall back

pub mod rules;
pub mod table;

pub use rules::{parse_rules, RuleError};
pub use table::{append_unique, RoutingTable};
