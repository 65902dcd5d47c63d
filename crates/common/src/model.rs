use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A unit of indexing work routed to exactly one worker. Created by the
/// Coordinator, consumed exactly once under normal operation; there is no
/// acknowledgment protocol, so a worker that crashes between dequeuing a
/// task and publishing its result silently drops that document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTask {
    pub doc_id: String,
    pub content: String,
}

/// A worker's answer for one document.
///
/// `partial` is wire-compatible with the historical doubly-keyed shape
/// `{term: {docId: freq}}`, where the inner map always has exactly one key
/// equal to `doc_id`. Internally everything past the wire boundary works
/// with the flattened `{term: freq}` shape via [`PartialIndexResult::flatten`]
/// and [`PartialIndexResult::from_flat`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialIndexResult {
    pub worker_id: String,
    pub doc_id: String,
    pub partial: HashMap<String, HashMap<String, u32>>,
}

impl PartialIndexResult {
    /// Builds the doubly-keyed wire shape from a flat `term -> frequency`
    /// map computed by the worker's tokenizer.
    pub fn from_flat(worker_id: String, doc_id: String, flat: HashMap<String, u32>) -> Self {
        let partial = flat
            .into_iter()
            .map(|(term, freq)| (term, HashMap::from([(doc_id.clone(), freq)])))
            .collect();

        PartialIndexResult {
            worker_id,
            doc_id,
            partial,
        }
    }

    /// Flattens `{term: {docId: freq}}` down to `{term: freq}`, dropping
    /// rows whose inner map does not carry this result's own `doc_id` (a
    /// malformed or foreign record) rather than trusting the redundancy.
    pub fn flatten(&self) -> HashMap<String, u32> {
        self.partial
            .iter()
            .filter_map(|(term, inner)| inner.get(&self.doc_id).map(|freq| (term.clone(), *freq)))
            .collect()
    }
}

/// A worker's heartbeat payload, written to `worker_status:{worker_id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub cpu_percent: f32,
    pub ram_percent: f32,
}

/// A worker status record joined with data only the broker can supply
/// (remaining TTL, queue depth) -- the shape the status aggregator (C8)
/// returns.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatusView {
    pub worker_id: String,
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub status_ttl_seconds: i64,
    pub queue_length: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_round_trips_from_flat() {
        let flat = HashMap::from([("cat".to_string(), 2u32), ("dog".to_string(), 1u32)]);
        let result = PartialIndexResult::from_flat("w1".into(), "a.txt".into(), flat.clone());
        assert_eq!(result.flatten(), flat);
    }

    #[test]
    fn flatten_drops_rows_for_a_foreign_doc_id() {
        let mut partial = HashMap::new();
        partial.insert(
            "cat".to_string(),
            HashMap::from([("other.txt".to_string(), 5u32)]),
        );
        let result = PartialIndexResult {
            worker_id: "w1".into(),
            doc_id: "a.txt".into(),
            partial,
        };
        assert!(result.flatten().is_empty());
    }
}
