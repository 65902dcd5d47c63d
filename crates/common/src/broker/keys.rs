/// Broker key/channel names are part of the wire contract (§6): changing
/// any of these breaks cross-version compatibility between a Coordinator
/// and Workers built from different revisions of this crate.
pub const PARTIAL_RESULTS_CHANNEL: &str = "idx_partial_results";

pub fn task_queue_key(worker_id: &str) -> String {
    format!("doc_processing_tasks:{worker_id}")
}

pub fn worker_status_key(worker_id: &str) -> String {
    format!("worker_status:{worker_id}")
}

pub const WORKER_STATUS_PATTERN: &str = "worker_status:*";

/// Extracts the worker id suffix from a `worker_status:{id}` key.
pub fn worker_id_from_status_key(key: &str) -> Option<&str> {
    key.strip_prefix("worker_status:")
}
