use std::collections::HashMap;
use std::time::Duration;

use idx_common::broker::{keys, BrokerClient};
use idx_common::lang::normalize;
use idx_common::{DocumentTask, Language, PartialIndexResult};
use tokio::sync::watch;

const DEQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs the task loop (§4.3) until `shutdown` fires. Blocks on its own
/// queue with a short timeout so shutdown stays responsive; a task that
/// fails to decode is logged and dropped, never retried or requeued.
pub async fn run(
    broker: &dyn BrokerClient,
    worker_id: &str,
    language: Language,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let dequeued = tokio::select! {
            biased;
            _ = shutdown.changed() => return,
            result = broker.blocking_dequeue(worker_id, DEQUEUE_TIMEOUT) => result,
        };

        let payload = match dequeued {
            Ok(Some(payload)) => payload,
            Ok(None) => continue, // timeout elapsed, nothing queued
            Err(e) => {
                tracing::warn!(error = %e, "dequeue failed, backing off");
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(500)) => continue,
                    _ = shutdown.changed() => return,
                }
            }
        };

        let task: DocumentTask = match serde_json::from_str(&payload) {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable task");
                continue;
            }
        };

        process_task(broker, worker_id, language, task).await;
    }
}

async fn process_task(broker: &dyn BrokerClient, worker_id: &str, language: Language, task: DocumentTask) {
    let flat = term_frequencies(&task.content, language);
    let result = PartialIndexResult::from_flat(worker_id.to_string(), task.doc_id.clone(), flat);

    let payload = match serde_json::to_string(&result) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, doc_id = %task.doc_id, "failed to encode partial result");
            return;
        }
    };

    if let Err(e) = broker.publish(keys::PARTIAL_RESULTS_CHANNEL, &payload).await {
        tracing::warn!(error = %e, doc_id = %task.doc_id, "failed to publish partial result, discarding");
    }
}

/// Empty content or content with no tokens after normalization still
/// produces an (empty) frequency map, so the Coordinator always sees a
/// `PartialIndexResult` for every dispatched task and can clear it from
/// the pending set.
fn term_frequencies(content: &str, language: Language) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for term in normalize(content, language) {
        *counts.entry(term).or_insert(0u32) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_frequencies_counts_occurrences() {
        let counts = term_frequencies("Cats and dogs and cats", Language::English);
        assert_eq!(counts.get("cat"), Some(&2));
        assert_eq!(counts.get("dog"), Some(&1));
        assert!(!counts.contains_key("and"));
    }

    #[test]
    fn empty_content_yields_empty_map() {
        assert!(term_frequencies("", Language::English).is_empty());
        assert!(term_frequencies("   ", Language::English).is_empty());
    }
}
