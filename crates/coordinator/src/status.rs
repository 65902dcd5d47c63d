use idx_common::broker::{keys, BrokerClient};
use idx_common::WorkerStatusView;

/// Enumerates live worker heartbeats and joins each with its queue depth
/// (C8). Missing or malformed records are silently omitted -- a worker
/// whose heartbeat key expired mid-scan simply does not appear, rather
/// than surfacing as an error.
pub async fn list_workers(broker: &dyn BrokerClient) -> idx_common::error::Result<Vec<WorkerStatusView>> {
    let status_keys = broker.keys_matching(keys::WORKER_STATUS_PATTERN).await?;
    let mut views = Vec::new();

    for key in status_keys {
        let Some(worker_id) = keys::worker_id_from_status_key(&key) else {
            continue;
        };

        let Some(raw) = broker.get(&key).await? else {
            continue;
        };
        let Ok(status) = serde_json::from_str::<idx_common::WorkerStatus>(&raw) else {
            continue;
        };
        let Some(ttl) = broker.ttl(&key).await? else {
            continue;
        };
        let queue_length = broker.queue_length(worker_id).await.unwrap_or(0);

        views.push(WorkerStatusView {
            worker_id: worker_id.to_string(),
            cpu_percent: status.cpu_percent,
            ram_percent: status.ram_percent,
            status_ttl_seconds: ttl,
            queue_length,
        });
    }

    views.sort_by(|a, b| a.worker_id.cmp(&b.worker_id));
    Ok(views)
}
