/*!
 * Free-text tokenization.
 *
 * Only maximal runs of ASCII letters are candidate words; digits,
 * punctuation and non-ASCII characters all act as separators.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use super::normalizer::normalize_word;

/// Minimum word length used by text import
pub const DEFAULT_MIN_WORD_LENGTH: usize = 2;

static ASCII_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z]+").expect("word pattern is valid")
});

/// Extract the distinct normalized words of `text`, sorted lexicographically.
///
/// Words shorter than `min_length` characters after normalization are dropped.
pub fn tokenize_text(text: &str, min_length: usize) -> Vec<String> {
    let words: BTreeSet<String> = ASCII_WORD_REGEX
        .find_iter(text)
        .map(|m| normalize_word(m.as_str()))
        .filter(|word| word.chars().count() >= min_length)
        .collect();

    words.into_iter().collect()
}
