use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use rust_stemmers::Algorithm;

use crate::error::{Error, Result};
use crate::lang::analyzer::Analyzer;
use crate::lang::filters::lowercase::LowercaseFilter;
use crate::lang::filters::stemmer::StemmerFilter;
use crate::lang::filters::stopword::StopWordFilter;
use crate::lang::tokenizer::StandardTokenizer;

/// The closed set of supported processing languages. Adding a language
/// means adding a variant here, a stopword list, and a stemmer algorithm;
/// nothing else in the pipeline changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    /// Returns the analyzer for this language, building it on first use
    /// and reusing it afterwards. Building an analyzer loads the stopword
    /// set and constructs the stemmer, so this makes warm-up idempotent
    /// and pays for it at most once per language per process.
    pub fn analyzer(&self) -> Arc<Analyzer> {
        static ENGLISH: OnceLock<Arc<Analyzer>> = OnceLock::new();
        static SPANISH: OnceLock<Arc<Analyzer>> = OnceLock::new();

        match self {
            Language::English => ENGLISH
                .get_or_init(|| Arc::new(build_english()))
                .clone(),
            Language::Spanish => SPANISH
                .get_or_init(|| Arc::new(build_spanish()))
                .clone(),
        }
    }
}

fn build_english() -> Analyzer {
    Analyzer::new(Box::new(StandardTokenizer::new()))
        .add_filter(Box::new(LowercaseFilter))
        .add_filter(Box::new(StopWordFilter::english()))
        .add_filter(Box::new(StemmerFilter::new(Algorithm::English)))
}

fn build_spanish() -> Analyzer {
    Analyzer::new(Box::new(StandardTokenizer::new()))
        .add_filter(Box::new(LowercaseFilter))
        .add_filter(Box::new(StopWordFilter::spanish()))
        .add_filter(Box::new(StemmerFilter::new(Algorithm::Spanish)))
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "english"),
            Language::Spanish => write!(f, "spanish"),
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "spanish" | "es" => Ok(Language::Spanish),
            other => Err(Error::InputInvalid(format!(
                "unsupported processing language '{other}', expected 'english' or 'spanish'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_languages() {
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Spanish".parse::<Language>().unwrap(), Language::Spanish);
    }

    #[test]
    fn rejects_unknown_language() {
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn analyzer_is_cached_across_calls() {
        let a = Language::English.analyzer();
        let b = Language::English.analyzer();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
