use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("input batch must be non-empty")]
    EmptyBatch,

    #[error("provider request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to reach provider: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("provider response is missing candidates[0].content.parts[0].text")]
    MalformedPayload,
}

impl GenerateError {
    /// Failures worth a second attempt, and worth degrading to a
    /// placeholder once attempts are exhausted. Configuration and
    /// input errors are neither.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            GenerateError::Timeout(_)
                | GenerateError::Transport(_)
                | GenerateError::Status(_)
                | GenerateError::MalformedPayload
        )
    }
}
