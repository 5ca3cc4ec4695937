//! OS signal handling.
//!
//! # Design Decisions
//! - Handlers are installed before the listener binds so a failure is fatal early
//! - SIGINT and SIGTERM both start the graceful shutdown, once
//! - A second signal is not handled specially

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Installed SIGINT/SIGTERM listeners.
pub struct TerminationSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl TerminationSignals {
    /// Register the handlers. Must run inside the tokio runtime.
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the first termination signal and return its name.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        let _ = tokio::signal::ctrl_c().await;
        "ctrl-c"
    }

    /// Spawn a task that triggers `shutdown` on the first signal.
    pub fn forward_to(mut self, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(async move {
            let signal = self.recv().await;
            tracing::info!(signal, "Termination signal received, shutting down");
            shutdown.trigger();
        })
    }
}
