//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (assign and propagate x-request-id)
//!     → handler.rs (/notify: route, read body, format, enqueue)
//!     → 200 / 400 / 503
//! ```

pub mod handler;
pub mod request;
pub mod server;

pub use handler::{NotifyError, NotifyParams};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
