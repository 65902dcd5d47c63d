use rust_stemmers::{Algorithm, Stemmer};

use crate::lang::filter::TokenFilter;
use crate::lang::token::Token;

/// Wraps a Snowball-family stemmer (`rust_stemmers`). `Algorithm::English`
/// is the classic Porter stemmer; `Algorithm::Spanish` is the Snowball
/// Spanish stemmer. Either way the filter itself is language-agnostic.
pub struct StemmerFilter {
    algorithm: Algorithm,
}

impl StemmerFilter {
    pub fn new(algorithm: Algorithm) -> Self {
        StemmerFilter { algorithm }
    }
}

impl TokenFilter for StemmerFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        let stemmer = Stemmer::create(self.algorithm);

        tokens
            .into_iter()
            .map(|mut token| {
                token.text = stemmer.stem(&token.text).into_owned();
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "stemmer"
    }
}
