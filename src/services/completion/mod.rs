//! External text-completion services
//!
//! The assistant treats the model API as an opaque service: a structured
//! prompt goes in, free text comes out, and the call may fail or time out.

use crate::error::AppResult;

pub mod deepseek;

pub use deepseek::{CompletionConfig, DeepSeekClient};

/// A prompt ready to be sent to a completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Instructions plus store context
    pub system_prompt: String,
    /// The user's query, verbatim
    pub user_message: String,
}

/// Trait for text-completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the prompt and returns the generated text
    ///
    /// Failures surface as `ExternalService` or `HttpClient` errors; no retry
    /// is attempted.
    async fn complete(&self, request: &CompletionRequest) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
