/*!
 * Translation providers.
 *
 * A provider turns one word and a language pair into a translation:
 * - `mymemory`: the MyMemory public HTTP API
 * - `mock`: scripted provider for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

pub mod mock;
pub mod mymemory;

/// One word to translate between two languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Word as stored
    pub word: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        word: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// External translation capability
///
/// Implementations issue a single bounded request and never panic: every
/// failure mode (network, timeout, malformed body, useless answer) comes
/// back as a `ProviderError`.
#[async_trait]
pub trait TranslationGateway: Send + Sync + Debug {
    /// Fetch a translation for `request.word`
    async fn fetch(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

/// Accept a provider answer only if it is non-empty and not the word echoed back
pub fn accept_translation(word: &str, candidate: &str) -> Result<String, ProviderError> {
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate == word {
        return Err(ProviderError::NoTranslation {
            word: word.to_string(),
        });
    }
    Ok(candidate.to_string())
}
