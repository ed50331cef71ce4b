use regex::Regex;
use std::sync::LazyLock;

// Digits and punctuation stripped from every token before lookup.
static STRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\d.:,"'()\[\]|/?!;]+"#).expect("valid regex literal"));

/// Whitespace tokenizer with the normalization word2vec vocabularies expect.
///
/// Tokens are split on whitespace, stripped of digits and the characters
/// `. : , " ' ( ) [ ] | / ? ! ;`, lowercased, and discarded if nothing is left.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|token| STRIP_REGEX.replace_all(token, "").to_lowercase())
            .filter(|token| !token.is_empty())
            .collect()
    }
}
