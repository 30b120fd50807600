//! Tokenizer and document reader
//!
//! Words are runs of letters and digits, optionally joined by single
//! apostrophes ("don't", "o'clock"). Everything else separates words.

use std::path::Path;
use std::sync::OnceLock;
use regex::Regex;
use crate::Result;

const WORD_PATTERN: &str = r"[\p{L}\p{N}]+(?:'[\p{L}\p{N}]+)*";

static WORD: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD.get_or_init(|| Regex::new(WORD_PATTERN).expect("word pattern is valid"))
}

/// Splits raw text into word tokens
#[derive(Debug, Clone)]
pub struct Tokenizer {
    word: &'static Regex,
    lowercase: bool,
}

impl Tokenizer {
    pub fn new(lowercase: bool) -> Self {
        Self {
            word: word_regex(),
            lowercase,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.word
            .find_iter(text)
            .map(|m| {
                if self.lowercase {
                    m.as_str().to_lowercase()
                } else {
                    m.as_str().to_string()
                }
            })
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Read a document, `None` if it does not exist
pub fn read_document(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
