/*!
 * Background translation requests.
 *
 * Each request runs on its own tokio task and only talks to the provider.
 * Results travel back over an mpsc channel; the caller that owns the
 * vocabulary store is the only one that writes them.
 */

use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::ProviderError;
use crate::providers::{TranslationGateway, TranslationRequest};

/// Result of one background fetch
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    /// The request that produced this result
    pub request: TranslationRequest,
    /// Translation text or the reason there is none
    pub outcome: Result<String, ProviderError>,
}

impl TranslationResult {
    /// Whether a usable translation came back
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Spawns fetches and hands their results back through one channel
pub struct TranslationWorker {
    gateway: Arc<dyn TranslationGateway>,
    sender: mpsc::UnboundedSender<TranslationResult>,
    receiver: mpsc::UnboundedReceiver<TranslationResult>,
    in_flight: usize,
}

impl TranslationWorker {
    /// Create a worker around a provider
    pub fn new(gateway: Arc<dyn TranslationGateway>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            gateway,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Start a fetch on a new task. The result arrives via [`next_result`](Self::next_result).
    pub fn spawn(&mut self, request: TranslationRequest) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sender = self.sender.clone();
        self.in_flight += 1;

        debug!("Spawning {} translation for '{}'", gateway.name(), request.word);

        tokio::spawn(async move {
            let fetch_request = request.clone();
            let fetch = tokio::spawn(async move { gateway.fetch(&fetch_request).await });

            // A panicking provider still yields a result, so in_flight always drains
            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ProviderError::RequestFailed(format!("translation task failed: {}", e))),
            };
            if let Err(e) = &outcome {
                warn!("Translation of '{}' failed: {}", request.word, e);
            }
            // The receiver only goes away when the worker is dropped
            let _ = sender.send(TranslationResult { request, outcome });
        })
    }

    /// Number of spawned fetches whose result has not been received yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wait for the next finished fetch, or `None` when nothing is pending
    pub async fn next_result(&mut self) -> Option<TranslationResult> {
        if self.in_flight == 0 {
            return None;
        }

        match self.receiver.recv().await {
            Some(result) => {
                self.in_flight -= 1;
                Some(result)
            }
            None => {
                self.in_flight = 0;
                None
            }
        }
    }
}
