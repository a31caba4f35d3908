/*!
 * MyMemory translation API client.
 *
 * `GET {endpoint}?q={word}&langpair={source}|{target}`; a usable answer is
 * an HTTP 200 whose JSON carries a non-empty `responseData.translatedText`
 * that differs from the word.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::{accept_translation, TranslationGateway, TranslationRequest};
use crate::errors::ProviderError;

/// Public MyMemory endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// MyMemory client
#[derive(Debug, Clone)]
pub struct MyMemory {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL
    endpoint: String,
    /// Request timeout in seconds, kept for error reporting
    timeout_secs: u64,
}

/// MyMemory response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,

    /// Sent as a number or a string depending on the error path
    #[serde(rename = "responseStatus", default)]
    response_status: Option<serde_json::Value>,

    #[serde(rename = "responseDetails", default)]
    response_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemory {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_ENDPOINT.to_string()
            } else {
                endpoint
            },
            timeout_secs,
        }
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }
}

impl Default for MyMemory {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS)
    }
}

/// Turn a raw HTTP answer into a translation or a failure
pub fn interpret_response(word: &str, status: StatusCode, body: &str) -> Result<String, ProviderError> {
    if status != StatusCode::OK {
        return Err(ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    let parsed: MyMemoryResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(e.to_string()))?;

    // The API reports some errors (bad language pair, quota) inside a 200 body
    if let Some(code) = parsed.response_status.as_ref().and_then(status_code_of) {
        if code != 200 {
            let message = parsed
                .response_details
                .as_ref()
                .map(|d| d.as_str().map(str::to_string).unwrap_or_else(|| d.to_string()))
                .unwrap_or_default();
            return Err(ProviderError::ApiError { status_code: code, message });
        }
    }

    let translated = parsed
        .response_data
        .and_then(|data| data.translated_text)
        .ok_or_else(|| ProviderError::ParseError("missing responseData.translatedText".to_string()))?;

    accept_translation(word, &translated)
}

fn status_code_of(value: &serde_json::Value) -> Option<u16> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl TranslationGateway for MyMemory {
    async fn fetch(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let langpair = format!("{}|{}", request.source_language, request.target_language);
        debug!("MyMemory request: q={:?} langpair={}", request.word, langpair);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", request.word.as_str()), ("langpair", langpair.as_str())])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        let result = interpret_response(&request.word, status, &body);
        if let Err(ProviderError::ApiError { status_code, message }) = &result {
            error!("MyMemory API error ({}): {}", status_code, message);
        }
        result
    }

    fn name(&self) -> &str {
        "mymemory"
    }
}
