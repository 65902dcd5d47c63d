use unicode_segmentation::UnicodeSegmentation;

use super::token::Token;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Splits on Unicode word boundaries; non-alphabetic words (numbers,
/// mixed-symbol tokens) are dropped at this stage rather than left for a
/// later filter, since the boundary between "word" and "not a term" is a
/// property of segmentation, not of the language-specific pipeline.
#[derive(Clone, Default)]
pub struct StandardTokenizer;

impl StandardTokenizer {
    pub fn new() -> Self {
        StandardTokenizer
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for word in text.unicode_words() {
            if !word.chars().all(|c| c.is_alphabetic()) {
                continue;
            }

            tokens.push(Token::new(word, position));
            position += 1;
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_numbers_and_punctuation() {
        let tok = StandardTokenizer::new();
        let got: Vec<_> = tok
            .tokenize("Cats, 2 dogs -- and cats!")
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(got, vec!["Cats", "dogs", "and", "cats"]);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let tok = StandardTokenizer::new();
        let got: Vec<_> = tok
            .tokenize("alpha alpha beta")
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(got, vec!["alpha", "alpha", "beta"]);
    }
}
