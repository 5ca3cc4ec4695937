//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, queue, dispatcher produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the HTTP layer into every handler log line
//! - Metric updates are recorded even when no exporter is installed (no-op)

pub mod logging;
pub mod metrics;
