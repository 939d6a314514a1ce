use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GenerateError;

/// First attempt runs on a short budget; the single retry gets twice as
/// long. Batch framing calls get one fixed mid-length budget and no retry.
pub const SHORT_TIMEOUT: Duration = Duration::from_secs(15);
pub const LONG_TIMEOUT: Duration = Duration::from_secs(30);
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// The reply text lives at candidates[0].content.parts[0].text; any
    /// absent level means the provider sent something we cannot use.
    fn into_text(self) -> Result<String, GenerateError> {
        self.candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| if p.is_empty() { None } else { Some(p.remove(0)) })
            .and_then(|p| p.text)
            .ok_or(GenerateError::MalformedPayload)
    }
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// One provider call with the given wall-clock budget.
    pub async fn generate_once(
        &self,
        prompt: &str,
        budget: Duration,
    ) -> Result<String, GenerateError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(GenerateError::MissingApiKey);
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .timeout(budget)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout(budget)
                } else {
                    GenerateError::Transport(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(GenerateError::Status(response.status()));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|_| GenerateError::MalformedPayload)?;

        let text = payload.into_text()?;
        debug!(chars = text.len(), "provider reply received");
        Ok(text)
    }

    /// Two-stage escalation for single word/phrase lookups: a short first
    /// attempt, then exactly one retry with a longer budget. Attempts are
    /// strictly sequential. Configuration errors are never retried.
    pub async fn generate_escalating(&self, prompt: &str) -> Result<String, GenerateError> {
        let first = match self.generate_once(prompt, SHORT_TIMEOUT).await {
            Ok(text) => return Ok(text),
            Err(e) if !e.is_degradable() => return Err(e),
            Err(e) => e,
        };

        warn!(
            timeout_secs = SHORT_TIMEOUT.as_secs(),
            error = %first,
            "first provider attempt failed, retrying with longer timeout"
        );

        match self.generate_once(prompt, LONG_TIMEOUT).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(
                    timeout_secs = LONG_TIMEOUT.as_secs(),
                    error = %e,
                    "second provider attempt failed"
                );
                Err(e)
            }
        }
    }

    /// Single fixed-budget call for batch sentence framing. No retry; the
    /// caller handles failure.
    pub async fn generate_batch(&self, prompt: &str) -> Result<String, GenerateError> {
        self.generate_once(prompt, BATCH_TIMEOUT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> GeminiClient {
        // Port 9 (discard) is closed in the test environment, so the
        // connection fails fast without waiting out a timeout.
        GeminiClient::new(ProviderConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        })
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_network_call() {
        let client = GeminiClient::new(ProviderConfig {
            api_key: None,
            // Unresolvable host: if a request were attempted it would
            // surface as Transport, not MissingApiKey.
            base_url: "http://gemini.invalid".to_string(),
            ..ProviderConfig::default()
        });
        let err = client
            .generate_once("prompt", SHORT_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingApiKey));
        assert!(!err.is_degradable());
    }

    #[tokio::test]
    async fn escalation_exhausts_both_attempts_on_transport_failure() {
        let client = unreachable_client();
        let err = client.generate_escalating("prompt").await.unwrap_err();
        assert!(matches!(err, GenerateError::Transport(_)));
        assert!(err.is_degradable());
    }

    #[tokio::test]
    async fn batch_call_does_not_retry() {
        let client = unreachable_client();
        let err = client.generate_batch("prompt").await.unwrap_err();
        assert!(matches!(err, GenerateError::Transport(_)));
    }

    #[test]
    fn malformed_payload_shapes_are_rejected() {
        let cases = [
            r#"{}"#,
            r#"{"candidates": []}"#,
            r#"{"candidates": [{}]}"#,
            r#"{"candidates": [{"content": {}}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{}]}}]}"#,
        ];
        for case in cases {
            let payload: GenerateContentResponse = serde_json::from_str(case).unwrap();
            assert!(
                matches!(payload.into_text(), Err(GenerateError::MalformedPayload)),
                "expected malformed payload for {case}"
            );
        }
    }

    #[test]
    fn well_formed_payload_yields_text() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hello"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.into_text().unwrap(), "hello");
    }
}
