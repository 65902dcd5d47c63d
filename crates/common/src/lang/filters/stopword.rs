use std::collections::HashSet;

use crate::lang::filter::TokenFilter;
use crate::lang::token::Token;

pub struct StopWordFilter {
    pub stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: Vec<&str>) -> Self {
        StopWordFilter {
            stop_words: stop_words.into_iter().map(String::from).collect(),
        }
    }

    pub fn english() -> Self {
        StopWordFilter::new(vec![
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
            "is", "it", "its", "of", "on", "that", "the", "to", "was", "will", "with",
        ])
    }

    pub fn spanish() -> Self {
        StopWordFilter::new(vec![
            "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las", "por", "un",
            "para", "con", "no", "una", "su", "al", "lo", "como", "mas", "pero", "sus", "le",
            "ya", "o", "este", "si", "porque", "esta", "entre", "cuando", "muy", "sin", "sobre",
            "tambien", "me", "hasta", "donde", "quien", "desde", "nos", "durante", "todos", "uno",
        ])
    }
}

impl TokenFilter for StopWordFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|token| !self.stop_words.contains(&token.text))
            .collect()
    }

    fn name(&self) -> &str {
        "stop_words"
    }
}
