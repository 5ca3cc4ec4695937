//! Bounded delivery queue.
//!
//! # Responsibilities
//! - Accept messages from many producers without blocking
//! - Hand messages to the single consumer in FIFO order
//! - Close exactly once, on request of the shutdown sequence
//!
//! # Design Decisions
//! - Backed by `tokio::sync::mpsc`; the channel provides all synchronization
//! - Closing is a separate one-shot handle, so producers cannot close the queue
//! - After close, buffered messages remain readable until the queue is empty

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::sync::mpsc::error::TrySendError;

use crate::message::OutboundMessage;
use crate::observability::metrics;

/// Why a message could not be enqueued.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    #[error("delivery queue is full")]
    Full,

    #[error("delivery queue is closed")]
    Closed,
}

/// Result of waiting on the consumer side.
#[derive(Debug, PartialEq, Eq)]
pub enum Dequeued {
    /// Next message in FIFO order.
    Message(OutboundMessage),
    /// The queue has just been closed; buffered messages may remain.
    Closed,
    /// Closed and empty. No further messages will arrive.
    Drained,
}

/// Create a queue with room for `capacity` messages.
///
/// # Panics
/// Panics if `capacity` is zero.
pub fn bounded(capacity: usize) -> (QueueProducer, QueueConsumer, QueueCloser) {
    let (tx, rx) = mpsc::channel(capacity);
    let (close_tx, close_rx) = oneshot::channel();
    (
        QueueProducer { tx },
        QueueConsumer {
            rx,
            close_rx: Some(close_rx),
        },
        QueueCloser { tx: close_tx },
    )
}

/// Producer half, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct QueueProducer {
    tx: mpsc::Sender<OutboundMessage>,
}

impl QueueProducer {
    /// Enqueue without waiting. Fails immediately when full or closed.
    pub fn try_enqueue(&self, message: OutboundMessage) -> Result<(), EnqueueError> {
        match self.tx.try_send(message) {
            Ok(()) => {
                metrics::set_queue_depth(self.depth());
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(EnqueueError::Full),
            Err(TrySendError::Closed(_)) => Err(EnqueueError::Closed),
        }
    }

    /// Messages currently buffered.
    pub fn depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

/// Consumer half, owned by the dispatcher.
#[derive(Debug)]
pub struct QueueConsumer {
    rx: mpsc::Receiver<OutboundMessage>,
    close_rx: Option<oneshot::Receiver<()>>,
}

enum Step {
    Close,
    Received(Option<OutboundMessage>),
}

impl QueueConsumer {
    /// Wait for the next event.
    ///
    /// Yields [`Dequeued::Closed`] once when the closer fires, then the
    /// remaining backlog, then [`Dequeued::Drained`] forever after.
    pub async fn next(&mut self) -> Dequeued {
        let Some(close_rx) = self.close_rx.as_mut() else {
            return match self.rx.recv().await {
                Some(message) => Dequeued::Message(message),
                None => Dequeued::Drained,
            };
        };

        let step = tokio::select! {
            biased;
            _ = close_rx => Step::Close,
            received = self.rx.recv() => Step::Received(received),
        };

        match step {
            Step::Close => {
                self.close();
                Dequeued::Closed
            }
            Step::Received(Some(message)) => Dequeued::Message(message),
            Step::Received(None) => {
                // All producers dropped: nothing can arrive, but only the
                // closer ends the queue.
                if let Some(close_rx) = self.close_rx.take() {
                    let _ = close_rx.await;
                }
                self.close();
                Dequeued::Closed
            }
        }
    }

    /// Messages buffered and not yet dequeued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.close_rx.is_none()
    }

    fn close(&mut self) {
        self.close_rx = None;
        self.rx.close();
    }
}

/// One-shot close handle held by the shutdown sequence.
#[derive(Debug)]
pub struct QueueCloser {
    tx: oneshot::Sender<()>,
}

impl QueueCloser {
    /// Close the queue. Producers get [`EnqueueError::Closed`] from now on.
    pub fn close(self) {
        let _ = self.tx.send(());
    }
}
