/*!
 * Mock translation provider.
 *
 * - `MockGateway::with_translations(..)` answers from a fixed dictionary
 * - `MockGateway::echo()` returns the word itself (rejected as no translation)
 * - `MockGateway::failing()` always fails with an API error
 * - `MockGateway::slow(..)` answers after a delay
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{accept_translation, TranslationGateway, TranslationRequest};
use crate::errors::ProviderError;

/// Behavior mode for the mock gateway
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Answer from the dictionary; unknown words get an empty answer
    Dictionary,
    /// Answer with the word unchanged
    Echo,
    /// Always fail with an HTTP-style error
    Failing,
    /// Answer from the dictionary after a delay
    Slow { delay_ms: u64 },
}

/// Scriptable gateway for tests
#[derive(Debug, Clone)]
pub struct MockGateway {
    behavior: MockBehavior,
    translations: HashMap<String, String>,
    request_count: Arc<AtomicUsize>,
}

impl MockGateway {
    /// Create a mock with the given behavior and an empty dictionary
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            translations: HashMap::new(),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Dictionary-backed mock
    pub fn with_translations<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut gateway = Self::new(MockBehavior::Dictionary);
        gateway.translations = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        gateway
    }

    /// Mock that echoes the word back
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Dictionary-backed mock that waits before answering
    pub fn slow(delay_ms: u64, entries: &[(&str, &str)]) -> Self {
        let mut gateway = Self::with_translations(entries.iter().copied());
        gateway.behavior = MockBehavior::Slow { delay_ms };
        gateway
    }

    /// Number of fetches issued so far (shared between clones)
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn lookup(&self, word: &str) -> String {
        self.translations.get(word).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TranslationGateway for MockGateway {
    async fn fetch(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let answer = match self.behavior {
            MockBehavior::Dictionary => self.lookup(&request.word),
            MockBehavior::Echo => request.word.clone(),
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "Simulated provider failure".to_string(),
                });
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                self.lookup(&request.word)
            }
        };

        accept_translation(&request.word, &answer)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
