use std::path::Path;
use std::sync::Arc;

use idx_common::broker::{keys, BrokerClient};
use idx_common::error::{Error, Result};
use idx_common::DocumentTask;

use crate::pending::PendingSet;

struct LiveWorker {
    worker_id: String,
    cpu_percent: f32,
    ram_percent: f32,
}

/// Composite load score (§4.4): one queued task outweighs a 10-point CPU
/// difference, so a dispatch never piles work onto a worker that is
/// merely a little hotter than an idle one with a backlog.
fn score(queue_length: u64, cpu_percent: f32, ram_percent: f32) -> f64 {
    queue_length as f64 * 10.0 + cpu_percent as f64 * 0.5 + ram_percent as f64 * 0.3
}

pub(crate) async fn live_workers(broker: &dyn BrokerClient) -> Result<Vec<LiveWorker>> {
    let keys = broker.keys_matching(keys::WORKER_STATUS_PATTERN).await?;
    let mut workers = Vec::new();

    for key in keys {
        let Some(worker_id) = keys::worker_id_from_status_key(&key) else {
            continue;
        };
        let Some(raw) = broker.get(&key).await? else {
            continue;
        };
        let Ok(status) = serde_json::from_str::<idx_common::WorkerStatus>(&raw) else {
            tracing::warn!(worker_id, "dropping malformed worker status record");
            continue;
        };

        workers.push(LiveWorker {
            worker_id: worker_id.to_string(),
            cpu_percent: status.cpu_percent,
            ram_percent: status.ram_percent,
        });
    }

    Ok(workers)
}

/// Selects the least-loaded live worker and enqueues `task` onto its
/// queue. Fails with `NoWorkersAvailable` if no heartbeat keys exist.
pub async fn dispatch(broker: &dyn BrokerClient, task: &DocumentTask) -> Result<String> {
    let workers = live_workers(broker).await?;
    if workers.is_empty() {
        return Err(Error::NoWorkersAvailable);
    }

    let mut best: Option<(String, f64)> = None;
    for worker in &workers {
        let queue_length = broker.queue_length(&worker.worker_id).await?;
        let s = score(queue_length, worker.cpu_percent, worker.ram_percent);

        let replace = match &best {
            None => true,
            Some((best_id, best_score)) => {
                s < *best_score || (s == *best_score && worker.worker_id < *best_id)
            }
        };
        if replace {
            best = Some((worker.worker_id.clone(), s));
        }
    }

    let (worker_id, _) = best.expect("workers is non-empty");
    let payload = serde_json::to_string(task)?;
    broker.enqueue_task(&worker_id, &payload).await?;
    Ok(worker_id)
}

/// Report returned by `/trigger-local-indexing/` (§6).
#[derive(Debug, Default)]
pub struct IndexingReport {
    pub successful_dispatches: Vec<String>,
    pub failed_files: Vec<(String, String)>,
    pub pending_count: usize,
}

/// Scans `dir` non-recursively for `.txt` files and dispatches each
/// non-empty one. Reading and dispatch happen sequentially; a failure on
/// one file is recorded and does not abort the rest.
pub async fn trigger_indexing(
    broker: &dyn BrokerClient,
    pending: &Arc<PendingSet>,
    dir: &Path,
) -> Result<IndexingReport> {
    if !dir.is_dir() {
        return Err(Error::InputInvalid(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    // §7/§8: zero live workers is a 503 for the whole trigger, not a
    // per-file failure recorded alongside a 202.
    if live_workers(broker).await?.is_empty() {
        return Err(Error::NoWorkersAvailable);
    }

    let mut report = IndexingReport::default();

    let entries = std::fs::read_dir(dir)?;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.failed_files.push(("<unreadable>".to_string(), e.to_string()));
                continue;
            }
        };

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let doc_id = entry.file_name().to_string_lossy().to_string();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                let reason = Error::DocumentReadFailure {
                    doc_id: doc_id.clone(),
                    reason: e.to_string(),
                }
                .to_string();
                report.failed_files.push((doc_id, reason));
                continue;
            }
        };

        if content.trim().is_empty() {
            let reason = Error::DocumentReadFailure {
                doc_id: doc_id.clone(),
                reason: "empty or whitespace-only content".to_string(),
            }
            .to_string();
            report.failed_files.push((doc_id, reason));
            continue;
        }

        let task = DocumentTask {
            doc_id: doc_id.clone(),
            content,
        };

        // A dispatch failure here means the broker itself is in trouble
        // (no live workers left mid-scan, or unreachable) -- that surfaces
        // as the trigger's own error, not a per-file failure, since the
        // remaining files have no better chance of dispatching either.
        dispatch(broker, &task).await?;
        pending.insert(doc_id.clone());
        report.successful_dispatches.push(doc_id);
    }

    report.pending_count = pending.len();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_weighs_one_queued_task_above_a_cpu_difference() {
        // Scenario from §8: w1 queue=2 cpu=10 ram=10; w2 queue=0 cpu=10 ram=10.
        let w1 = score(2, 10.0, 10.0);
        let w2 = score(0, 10.0, 10.0);
        assert_eq!(w1, 28.0);
        assert_eq!(w2, 8.0);
        assert!(w2 < w1);
    }

    #[test]
    fn score_prefers_low_cpu_ram_when_queues_are_equal() {
        let w1 = score(5, 10.0, 10.0);
        let w2 = score(0, 90.0, 90.0);
        assert_eq!(w1, 58.0);
        assert_eq!(w2, 72.0);
        assert!(w1 < w2);
    }
}
