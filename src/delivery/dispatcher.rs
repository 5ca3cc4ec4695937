//! Single-consumer delivery loop.
//!
//! # States
//! ```text
//! Running  → Draining: queue closed while messages remain
//! Running  → Stopped:  queue closed and already empty
//! Draining → Stopped:  last buffered message handled
//! ```

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use crate::delivery::deliverer::Deliverer;
use crate::delivery::queue::{Dequeued, QueueConsumer};
use crate::message::OutboundMessage;
use crate::observability::metrics;

/// Lifecycle state of the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Running,
    Draining,
    Stopped,
}

/// Counts reported when the dispatcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: u64,
    pub failed: u64,
}

impl DispatchSummary {
    pub fn attempted(&self) -> u64 {
        self.delivered + self.failed
    }
}

/// Drains the delivery queue, one outbound call at a time.
pub struct Dispatcher {
    consumer: QueueConsumer,
    deliverer: Arc<dyn Deliverer>,
    state: watch::Sender<DispatcherState>,
}

impl Dispatcher {
    pub fn new(consumer: QueueConsumer, deliverer: Arc<dyn Deliverer>) -> Self {
        let (state, _) = watch::channel(DispatcherState::Running);
        Self {
            consumer,
            deliverer,
            state,
        }
    }

    /// Run the loop on its own task.
    pub fn spawn(self) -> DispatcherHandle {
        let state = self.state.subscribe();
        let task = tokio::spawn(self.run());
        DispatcherHandle { state, task }
    }

    /// Deliver until the queue is closed and empty.
    pub async fn run(mut self) -> DispatchSummary {
        tracing::info!("Dispatcher started");
        let mut summary = DispatchSummary::default();

        loop {
            match self.consumer.next().await {
                Dequeued::Message(message) => self.dispatch(&message, &mut summary).await,
                Dequeued::Closed => {
                    let pending = self.consumer.len();
                    if pending > 0 {
                        tracing::info!(pending, "Delivery queue closed, draining backlog");
                        self.state.send_replace(DispatcherState::Draining);
                    } else {
                        tracing::info!("Delivery queue closed with no backlog");
                    }
                }
                Dequeued::Drained => break,
            }
        }

        self.state.send_replace(DispatcherState::Stopped);
        tracing::info!(
            delivered = summary.delivered,
            failed = summary.failed,
            "Dispatcher stopped"
        );
        summary
    }

    async fn dispatch(&self, message: &OutboundMessage, summary: &mut DispatchSummary) {
        let start = Instant::now();
        match self.deliverer.deliver(message).await {
            Ok(()) => {
                summary.delivered += 1;
                metrics::record_delivery("delivered", start);
                tracing::debug!(
                    destination_id = message.destination_id(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Message delivered"
                );
            }
            Err(e) => {
                summary.failed += 1;
                metrics::record_delivery("failed", start);
                tracing::warn!(
                    destination_id = message.destination_id(),
                    error = %e,
                    "Delivery failed, message dropped"
                );
            }
        }
        metrics::set_queue_depth(self.consumer.len());
    }
}

/// Handle to a spawned dispatcher.
pub struct DispatcherHandle {
    state: watch::Receiver<DispatcherState>,
    task: JoinHandle<DispatchSummary>,
}

impl DispatcherHandle {
    pub fn state(&self) -> DispatcherState {
        *self.state.borrow()
    }

    /// A receiver that observes every state transition.
    pub fn watch_state(&self) -> watch::Receiver<DispatcherState> {
        self.state.clone()
    }

    /// Wait until the dispatcher reaches `Stopped`.
    pub async fn wait(self) -> Result<DispatchSummary, JoinError> {
        self.task.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::deliverer::DeliveryError;
    use crate::delivery::queue;
    use crate::message::RenderMode;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Semaphore;

    /// Records every message; fails destinations listed in `failing`.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<i64>>,
        failing: Vec<i64>,
    }

    #[async_trait]
    impl Deliverer for Recorder {
        async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
            self.seen.lock().unwrap().push(message.destination_id());
            if self.failing.contains(&message.destination_id()) {
                return Err(DeliveryError::Rejected {
                    status: 400,
                    body: "chat not found".into(),
                });
            }
            Ok(())
        }
    }

    /// Blocks each delivery until a permit is released.
    struct Gated {
        gate: Arc<Semaphore>,
        seen: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl Deliverer for Gated {
        async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
            self.gate.acquire().await.unwrap().forget();
            self.seen.lock().unwrap().push(message.destination_id());
            Ok(())
        }
    }

    fn msg(id: i64) -> OutboundMessage {
        OutboundMessage::new(id, "text", RenderMode::Plain, true)
    }

    #[tokio::test]
    async fn test_delivers_in_fifo_order_and_stops_after_close() {
        let (producer, consumer, closer) = queue::bounded(10);
        let recorder = Arc::new(Recorder::default());
        let handle = Dispatcher::new(consumer, recorder.clone()).spawn();

        for id in [5, 3, 9, 1] {
            producer.try_enqueue(msg(id)).unwrap();
        }
        closer.close();

        let summary = handle.wait().await.unwrap();
        assert_eq!(summary, DispatchSummary { delivered: 4, failed: 0 });
        assert_eq!(*recorder.seen.lock().unwrap(), vec![5, 3, 9, 1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_producers_keep_enqueue_order() {
        let (producer, consumer, closer) = queue::bounded(256);
        let recorder = Arc::new(Recorder::default());
        let handle = Dispatcher::new(consumer, recorder.clone()).spawn();
        let enqueued = Arc::new(Mutex::new(Vec::new()));

        let tasks: Vec<_> = (0..8i64)
            .map(|task| {
                let producer = producer.clone();
                let enqueued = enqueued.clone();
                tokio::spawn(async move {
                    for n in 0..25i64 {
                        let id = task * 100 + n;
                        {
                            let mut log = enqueued.lock().unwrap();
                            producer.try_enqueue(msg(id)).unwrap();
                            log.push(id);
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        closer.close();

        let summary = handle.wait().await.unwrap();
        assert_eq!(summary.delivered, 200);
        assert_eq!(*recorder.seen.lock().unwrap(), *enqueued.lock().unwrap());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_loop() {
        let (producer, consumer, closer) = queue::bounded(10);
        let recorder = Arc::new(Recorder {
            failing: vec![2],
            ..Default::default()
        });
        let handle = Dispatcher::new(consumer, recorder.clone()).spawn();

        for id in 1..=3 {
            producer.try_enqueue(msg(id)).unwrap();
        }
        closer.close();

        let summary = handle.wait().await.unwrap();
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.attempted(), 3);
        assert_eq!(*recorder.seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_draining_state_until_backlog_empty() {
        let (producer, consumer, closer) = queue::bounded(10);
        let gate = Arc::new(Semaphore::new(0));
        let gated = Arc::new(Gated {
            gate: gate.clone(),
            seen: Mutex::new(Vec::new()),
        });
        let handle = Dispatcher::new(consumer, gated.clone()).spawn();
        let mut states = handle.watch_state();
        assert_eq!(handle.state(), DispatcherState::Running);

        for id in 1..=3 {
            producer.try_enqueue(msg(id)).unwrap();
        }
        // Let the dispatcher pick up message 1 and block on the gate.
        while producer.depth() != 2 {
            tokio::task::yield_now().await;
        }
        closer.close();
        gate.add_permits(1);

        states
            .wait_for(|s| *s == DispatcherState::Draining)
            .await
            .unwrap();

        gate.add_permits(2);
        let summary = handle.wait().await.unwrap();
        assert_eq!(summary.delivered, 3);
        assert_eq!(*gated.seen.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(*states.borrow(), DispatcherState::Stopped);
    }

    #[tokio::test]
    async fn test_idle_dispatcher_waits_for_close() {
        let (producer, consumer, closer) = queue::bounded(1);
        let handle = Dispatcher::new(consumer, Arc::new(Recorder::default())).spawn();

        drop(producer);
        tokio::task::yield_now().await;
        assert_eq!(handle.state(), DispatcherState::Running);

        closer.close();
        let summary = handle.wait().await.unwrap();
        assert_eq!(summary.attempted(), 0);
    }
}
