use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use idx_common::error::Result;
use parking_lot::RwLock;
use tempfile::NamedTempFile;

/// The global inverted index (C6): `term -> {docId -> frequency}`.
///
/// The merger is the sole writer; the query engine and the status/save
/// endpoints are readers. A single `RwLock` around the outer map is
/// enough to satisfy the invariant that a reader never observes a torn
/// posting list, because every mutation that touches a term's row holds
/// the write guard for the whole of that mutation.
pub struct InvertedIndex {
    inner: RwLock<HashMap<String, HashMap<String, u32>>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Merges one document's term frequencies into the index. Last-writer
    /// wins per `(term, docId)`: re-indexing a `docId` overwrites its
    /// counts for every term present in `flat`, leaving untouched any term
    /// from a prior indexing of the same document that no longer appears.
    pub fn merge(&self, doc_id: &str, flat: &HashMap<String, u32>) {
        let mut index = self.inner.write();
        for (term, freq) in flat {
            index
                .entry(term.clone())
                .or_default()
                .insert(doc_id.to_string(), *freq);
        }
    }

    /// Postings for one already-normalized term, sorted by frequency
    /// descending then docId ascending for deterministic output.
    pub fn postings(&self, term: &str) -> Vec<(String, u32)> {
        let index = self.inner.read();
        let Some(row) = index.get(term) else {
            return Vec::new();
        };

        let mut postings: Vec<(String, u32)> =
            row.iter().map(|(doc, freq)| (doc.clone(), *freq)).collect();
        postings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        postings
    }

    pub fn total_terms(&self) -> usize {
        self.inner.read().len()
    }

    /// Atomically writes the full index as gzip-compressed JSON. Writes
    /// to a temporary file in the snapshot's own directory, then renames
    /// it into place, so a concurrent reader of `path` always sees either
    /// the previous snapshot or the new one in full.
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = self.inner.read().clone();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        {
            let mut encoder = GzEncoder::new(&mut tmp, Compression::default());
            let json = serde_json::to_vec(&snapshot)?;
            encoder.write_all(&json)?;
            encoder.finish()?;
        }

        tmp.persist(path)
            .map_err(|e| idx_common::Error::PersistenceFailure(e.to_string()))?;
        Ok(())
    }

    /// Replaces the in-memory index in one step. Absence of the file is
    /// not an error: it yields an empty index, matching a fresh boot.
    pub fn load(&self, path: &Path) -> Result<()> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                *self.inner.write() = HashMap::new();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let mut decoder = GzDecoder::new(bytes.as_slice());
        let mut json = Vec::new();
        decoder.read_to_end(&mut json)?;

        let loaded: HashMap<String, HashMap<String, u32>> = serde_json::from_slice(&json)?;
        *self.inner.write() = loaded;
        Ok(())
    }
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_then_search_ranks_by_frequency() {
        let index = InvertedIndex::new();
        index.merge("a.txt", &HashMap::from([("alpha".into(), 2), ("beta".into(), 1)]));
        index.merge("b.txt", &HashMap::from([("alpha".into(), 1), ("beta".into(), 3)]));

        assert_eq!(
            index.postings("beta"),
            vec![("b.txt".to_string(), 3), ("a.txt".to_string(), 1)]
        );
    }

    #[test]
    fn reindexing_a_doc_overwrites_its_counts() {
        let index = InvertedIndex::new();
        index.merge("a.txt", &HashMap::from([("alpha".into(), 2)]));
        index.merge("a.txt", &HashMap::from([("alpha".into(), 5)]));
        assert_eq!(index.postings("alpha"), vec![("a.txt".to_string(), 5)]);
    }

    #[test]
    fn absent_term_yields_empty_postings() {
        let index = InvertedIndex::new();
        assert!(index.postings("nope").is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let index = InvertedIndex::new();
        index.merge("a.txt", &HashMap::from([("alpha".into(), 2), ("beta".into(), 1)]));
        index.merge("b.txt", &HashMap::from([("alpha".into(), 1), ("beta".into(), 3)]));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json.gz");
        index.save(&path).unwrap();

        let reloaded = InvertedIndex::new();
        reloaded.load(&path).unwrap();

        assert_eq!(reloaded.postings("alpha"), index.postings("alpha"));
        assert_eq!(reloaded.postings("beta"), index.postings("beta"));
    }

    #[test]
    fn load_of_absent_file_yields_empty_index() {
        let index = InvertedIndex::new();
        let dir = tempfile::tempdir().unwrap();
        index.load(&dir.path().join("missing.json.gz")).unwrap();
        assert_eq!(index.total_terms(), 0);
    }
}
