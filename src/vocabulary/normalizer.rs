/*!
 * Word normalization.
 *
 * A normalized word is trimmed, has typographic quotes folded to ASCII,
 * has leading and trailing non-word characters (apostrophes excepted)
 * removed, and is lower-cased. It is the natural key of the vocabulary store.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading or trailing runs of characters that are neither word characters
/// nor apostrophes. `\w` is Unicode-aware, so accented letters survive.
static BOUNDARY_NOISE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\w']+|[^\w']+$").expect("boundary pattern is valid")
});

/// Typographic quotes and their ASCII replacements
const QUOTE_FOLDS: &[(char, char)] = &[
    ('\u{2019}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
];

fn fold_quotes(text: &str) -> String {
    text.chars()
        .map(|c| {
            QUOTE_FOLDS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Canonicalize a raw token into a word key.
///
/// Total and deterministic: empty input yields empty output, and
/// `normalize_word(normalize_word(s)) == normalize_word(s)`.
pub fn normalize_word(raw: &str) -> String {
    let folded = fold_quotes(raw.trim());
    let stripped = BOUNDARY_NOISE_REGEX.replace_all(&folded, "");
    stripped.to_lowercase()
}
