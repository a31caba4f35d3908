/*!
 * Word canonicalization.
 *
 * - `normalizer`: turns a raw token into the store's comparable word key
 * - `tokenizer`: extracts the distinct candidate words from free text
 */

pub mod normalizer;
pub mod tokenizer;

pub use normalizer::normalize_word;
pub use tokenizer::{tokenize_text, DEFAULT_MIN_WORD_LENGTH};
