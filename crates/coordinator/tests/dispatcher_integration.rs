use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::Stream;
use idx_common::broker::{BrokerClient, PayloadStream};
use idx_common::error::Result;
use idx_common::{DocumentTask, Language, WorkerStatus};
use parking_lot::Mutex;

/// An in-process stand-in for `RedisBroker` used by tests that want to
/// exercise the dispatcher/merger/index wiring without a live Redis.
/// Implements the same [`BrokerClient`] trait the production code depends
/// on, so nothing under test can tell the difference.
#[derive(Default)]
struct FakeBroker {
    queues: Mutex<HashMap<String, Vec<String>>>,
    strings: Mutex<HashMap<String, (String, Instant, Duration)>>,
}

#[async_trait]
impl BrokerClient for FakeBroker {
    async fn enqueue_task(&self, worker_id: &str, payload: &str) -> Result<()> {
        self.queues
            .lock()
            .entry(worker_id.to_string())
            .or_default()
            .push(payload.to_string());
        Ok(())
    }

    async fn blocking_dequeue(&self, worker_id: &str, _timeout: Duration) -> Result<Option<String>> {
        let mut queues = self.queues.lock();
        Ok(queues.get_mut(worker_id).and_then(|q| {
            if q.is_empty() {
                None
            } else {
                Some(q.remove(0))
            }
        }))
    }

    async fn queue_length(&self, worker_id: &str) -> Result<u64> {
        Ok(self
            .queues
            .lock()
            .get(worker_id)
            .map(|q| q.len() as u64)
            .unwrap_or(0))
    }

    async fn publish(&self, _channel: &str, _payload: &str) -> Result<()> {
        Ok(())
    }

    async fn subscribe(&self, _channel: &str) -> Result<PayloadStream> {
        let empty: Pin<Box<dyn Stream<Item = String> + Send>> =
            Box::pin(futures_util::stream::empty());
        Ok(empty)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.strings
            .lock()
            .insert(key.to_string(), (value.to_string(), Instant::now(), ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.strings.lock().get(key).map(|(v, _, _)| v.clone()))
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .strings
            .lock()
            .iter()
            .filter(|(k, (_, set_at, ttl))| k.starts_with(prefix) && set_at.elapsed() < *ttl)
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.strings.lock().get(key).and_then(|(_, set_at, ttl)| {
            let remaining = ttl.checked_sub(set_at.elapsed())?;
            Some(remaining.as_secs() as i64)
        }))
    }
}

impl FakeBroker {
    async fn set_heartbeat(&self, worker_id: &str, cpu: f32, ram: f32) {
        let status = WorkerStatus {
            cpu_percent: cpu,
            ram_percent: ram,
        };
        self.set_with_ttl(
            &idx_common::broker::keys::worker_status_key(worker_id),
            &serde_json::to_string(&status).unwrap(),
            Duration::from_secs(6),
        )
        .await
        .unwrap();
    }
}

#[path = "../src/dispatcher.rs"]
mod dispatcher;
#[path = "../src/index.rs"]
mod index;
#[path = "../src/pending.rs"]
mod pending;

#[tokio::test]
async fn dispatch_selects_the_least_loaded_live_worker() {
    let broker = FakeBroker::default();
    broker.set_heartbeat("w1", 10.0, 10.0).await;
    broker.set_heartbeat("w2", 10.0, 10.0).await;
    // Give w1 a 2-deep backlog; §8 scenario 5 expects w2 to win.
    broker.enqueue_task("w1", "{}").await.unwrap();
    broker.enqueue_task("w1", "{}").await.unwrap();

    let task = DocumentTask {
        doc_id: "a.txt".into(),
        content: "hello world".into(),
    };

    let chosen = dispatcher::dispatch(&broker, &task).await.unwrap();
    assert_eq!(chosen, "w2");
}

#[tokio::test]
async fn dispatch_fails_with_no_live_workers() {
    let broker = FakeBroker::default();
    let task = DocumentTask {
        doc_id: "a.txt".into(),
        content: "hello".into(),
    };
    let err = dispatcher::dispatch(&broker, &task).await.unwrap_err();
    assert!(matches!(err, idx_common::Error::NoWorkersAvailable));
}

#[tokio::test]
async fn trigger_indexing_reports_skipped_empty_files_and_dispatches_the_rest() {
    let broker = FakeBroker::default();
    broker.set_heartbeat("w1", 0.0, 0.0).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "alpha alpha beta").unwrap();
    std::fs::write(dir.path().join("empty.txt"), "   ").unwrap();
    std::fs::write(dir.path().join("ignored.md"), "not a txt file").unwrap();

    let pending = Arc::new(pending::PendingSet::new());
    let report = dispatcher::trigger_indexing(&broker, &pending, dir.path())
        .await
        .unwrap();

    assert_eq!(report.successful_dispatches, vec!["a.txt".to_string()]);
    assert_eq!(report.failed_files.len(), 1);
    assert_eq!(report.failed_files[0].0, "empty.txt");
    assert_eq!(report.pending_count, 1);
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn trigger_indexing_returns_no_workers_available_with_zero_live_workers() {
    let broker = FakeBroker::default();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "alpha beta").unwrap();

    let pending = Arc::new(pending::PendingSet::new());
    let err = dispatcher::trigger_indexing(&broker, &pending, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, idx_common::Error::NoWorkersAvailable));
    assert!(pending.is_empty());
}

#[tokio::test]
async fn dispatcher_never_routes_to_a_worker_with_no_heartbeat() {
    let broker = FakeBroker::default();
    // w_dead has a queue but no heartbeat key: must never be selected.
    broker.enqueue_task("w_dead", "{}").await.ok();
    broker.set_heartbeat("w_alive", 50.0, 50.0).await;

    let task = DocumentTask {
        doc_id: "a.txt".into(),
        content: "hello".into(),
    };
    let chosen = dispatcher::dispatch(&broker, &task).await.unwrap();
    assert_eq!(chosen, "w_alive");
}

#[allow(dead_code)]
fn unused(_l: Language) {}
