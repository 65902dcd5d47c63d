use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// The set of `docId`s dispatched but not yet merged (§3). Purely a
/// status-reporting aid: nothing in the dispatch/merge path depends on
/// its contents, and it is never pruned automatically (§9) -- a worker
/// crash after dequeue leaves its docId here forever, which is the
/// documented, not-yet-fixed, way operators notice a stuck pipeline.
pub struct PendingSet {
    inner: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl PendingSet {
    pub fn new() -> Self {
        PendingSet {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, doc_id: String) {
        self.inner.lock().insert(doc_id, Utc::now());
    }

    pub fn remove(&self, doc_id: &str) {
        self.inner.lock().remove(doc_id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PendingSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_remove_clears_the_entry() {
        let pending = PendingSet::new();
        pending.insert("a.txt".to_string());
        assert_eq!(pending.len(), 1);
        pending.remove("a.txt");
        assert!(pending.is_empty());
    }

    #[test]
    fn removing_an_absent_doc_is_a_no_op() {
        let pending = PendingSet::new();
        pending.remove("never-dispatched.txt");
        assert!(pending.is_empty());
    }
}
