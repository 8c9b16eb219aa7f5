/// LLM Client — the single point of entry for all text-generation calls in TalentScout.
///
/// ARCHITECTURAL RULE: No other module may call the generation backend directly.
/// All LLM interactions MUST go through this module.
///
/// Backend: a local Ollama server. Model: tinyllama (hardcoded, sampled at temperature 0).
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// The model used for all generation calls.
/// Hardcoded so question wording stays reproducible across deployments.
pub const MODEL: &str = "tinyllama";
const TEMPERATURE: f32 = 0.0;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend unavailable after {retries} retries")]
    Exhausted { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub response: String,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

impl LlmResponse {
    /// Returns the generated text, or `None` when the model produced nothing.
    pub fn text(&self) -> Option<&str> {
        let text = self.response.trim();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// The single LLM client used by all services in TalentScout.
/// Wraps the Ollama generate API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Makes a raw, non-streaming generate call, returning the full response object.
    /// Retries on connection failures, 429 and 5xx with exponential backoff.
    /// A request that times out is returned immediately, so the configured timeout
    /// bounds the time spent waiting on a slow backend.
    pub async fn call(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let request_body = GenerateRequest {
            model: MODEL,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.generate_url())
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if is_retryable(&e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM backend returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OllamaError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                llm_response.prompt_eval_count, llm_response.eval_count
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the model and returns the trimmed, non-empty text.
    pub async fn call_text(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Only failures to reach the backend are worth another attempt.
fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_connect() && !err.is_timeout()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            model: MODEL,
            prompt: "hello",
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "tinyllama");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.0);
    }

    #[test]
    fn test_response_text_trims() {
        let response: LlmResponse =
            serde_json::from_str(r#"{"response": "  An answer.\n", "done": true}"#).unwrap();
        assert_eq!(response.text(), Some("An answer."));
        assert_eq!(response.eval_count, None);
    }

    #[test]
    fn test_response_text_blank_is_none() {
        let response: LlmResponse = serde_json::from_str(r#"{"response": " \n "}"#).unwrap();
        assert_eq!(response.text(), None);
    }

    #[tokio::test]
    async fn test_timeout_is_not_retried() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = LlmClient::new(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        let started = std::time::Instant::now();
        let err = client.call("hello").await.unwrap_err();
        match err {
            LlmError::Http(e) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {other:?}"),
        }
        // A retry would add at least one second of backoff.
        assert!(started.elapsed() < Duration::from_millis(900));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = LlmClient::new("http://localhost:11434/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.generate_url(), "http://localhost:11434/api/generate");
    }
}
