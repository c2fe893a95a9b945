// Text-completion service abstraction
//
// The composer only needs "prompt in, text out". Anything that can do that
// (Gemini, a stub in tests) implements `CompletionService`.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to completion service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("completion service returned an unreadable response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("completion service returned no text")]
    Empty,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one prompt and returns the generated text unmodified.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Short provider name for logs, e.g. "gemini".
    fn name(&self) -> &str;
}
