use std::sync::Arc;

use futures_util::StreamExt;
use idx_common::broker::{keys, BrokerClient};
use idx_common::PartialIndexResult;
use tokio::sync::watch;

use crate::index::InvertedIndex;
use crate::pending::PendingSet;

/// Runs the merger loop (C5) until `shutdown` fires. Subscribes once to
/// `idx_partial_results`; malformed records are logged and dropped, never
/// allowed to end the subscription, since one bad worker must not stop
/// merges for everyone else.
pub async fn run(
    broker: Arc<dyn BrokerClient>,
    index: Arc<InvertedIndex>,
    pending: Arc<PendingSet>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let mut stream = match broker.subscribe(keys::PARTIAL_RESULTS_CHANNEL).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(error = %e, "merger failed to subscribe, retrying shortly");
                tokio::select! {
                    _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => continue,
                    _ = shutdown.changed() => return,
                }
            }
        };

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => return,

                maybe_payload = stream.next() => {
                    match maybe_payload {
                        Some(payload) => handle_message(&payload, &index, &pending),
                        None => break, // subscription ended, re-subscribe
                    }
                }
            }
        }
    }
}

fn handle_message(payload: &str, index: &InvertedIndex, pending: &PendingSet) {
    let result: PartialIndexResult = match serde_json::from_str(payload) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed partial result");
            return;
        }
    };

    let flat = result.flatten();
    index.merge(&result.doc_id, &flat);
    pending.remove(&result.doc_id);
    tracing::debug!(
        doc_id = %result.doc_id,
        worker_id = %result.worker_id,
        terms = flat.len(),
        "merged partial result"
    );
}
