//! The language model, seen as a slow and unreliable text source.

use async_trait::async_trait;

pub mod openai;
pub mod timed;

pub use openai::OpenAiCompletion;
pub use timed::{CallFailure, TimedCompletion};

/// Errors a completion provider can report
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion service returned no choices")]
    EmptyReply,

    #[error("completion service is not configured: {0}")]
    Misconfigured(String),

    #[error("completion worker stopped before replying")]
    WorkerLost,
}

impl CompletionError {
    /// Errors that retrying cannot fix
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompletionError::Misconfigured(_))
    }
}

/// A chat-completion endpoint: one system prompt in, free text out
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError>;
}
