//! Shutdown sequencing: stop accepting, close the queue, drain, exit.

use std::sync::Arc;
use std::time::Duration;

use notify_relay::config::RelayConfig;
use reqwest::StatusCode;
use tokio::sync::Semaphore;

mod common;

#[tokio::test]
async fn test_backlog_drained_before_exit() {
    let gate = Arc::new(Semaphore::new(0));
    let recorder = common::RecordingDeliverer::gated(gate.clone());
    let relay = common::start_relay(RelayConfig::default(), "a:1,2;3", recorder.clone()).await;
    let client = common::client();

    for i in 0..3 {
        let res = client
            .post(relay.url("/notify?from=a"))
            .body(format!("n{}", i))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    relay.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Server is gone, but the dispatcher is still blocked on the backlog.
    assert!(client.post(relay.url("/notify")).body("late").send().await.is_err());
    assert!(!relay.task.is_finished());
    assert!(recorder.messages().is_empty());

    gate.add_permits(6);
    let summary = relay.task.await.unwrap().unwrap();
    assert_eq!(summary.delivered, 6);

    let delivered: Vec<(i64, String)> = recorder
        .messages()
        .iter()
        .map(|m| (m.destination_id(), m.text().to_string()))
        .collect();
    assert_eq!(
        delivered,
        vec![
            (1, "a: n0".to_string()),
            (2, "a: n0".to_string()),
            (1, "a: n1".to_string()),
            (2, "a: n1".to_string()),
            (1, "a: n2".to_string()),
            (2, "a: n2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_idle_relay_stops_promptly() {
    let recorder = common::RecordingDeliverer::new();
    let relay = common::start_relay(RelayConfig::default(), "", recorder.clone()).await;

    let res = common::client()
        .post(relay.url("/notify"))
        .body("nobody listens")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let summary = tokio::time::timeout(Duration::from_secs(5), relay.stop())
        .await
        .expect("relay did not stop");
    assert_eq!(summary.attempted(), 0);
    assert!(recorder.messages().is_empty());
}
