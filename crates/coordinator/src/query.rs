use idx_common::lang::normalize;
use idx_common::Language;

use crate::index::InvertedIndex;

/// Searches for one normalized term (C7). Multi-token raw terms collapse
/// to their first token -- multi-term queries are a documented non-goal,
/// not an oversight (§4.7).
pub fn search(index: &InvertedIndex, raw_term: &str, language: Language) -> Vec<(String, u32)> {
    let tokens = normalize(raw_term, language);
    let Some(term) = tokens.into_iter().next() else {
        return Vec::new();
    };

    index.postings(&term)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn single_document_single_term() {
        let index = InvertedIndex::new();
        index.merge(
            "a.txt",
            &HashMap::from([("cat".to_string(), 2u32), ("dog".to_string(), 1u32)]),
        );
        assert_eq!(
            search(&index, "cat", Language::English),
            vec![("a.txt".to_string(), 2)]
        );
    }

    #[test]
    fn stopword_only_query_returns_empty() {
        let index = InvertedIndex::new();
        index.merge("a.txt", &HashMap::from([("cat".to_string(), 2u32)]));
        assert!(search(&index, "and", Language::English).is_empty());
    }

    #[test]
    fn multi_token_query_uses_only_the_first_token() {
        let index = InvertedIndex::new();
        index.merge("a.txt", &HashMap::from([("cat".to_string(), 2u32)]));
        // "cats dogs" normalizes to ["cat", "dog"]; only "cat" is looked up.
        assert_eq!(
            search(&index, "cats dogs", Language::English),
            vec![("a.txt".to_string(), 2)]
        );
    }
}
