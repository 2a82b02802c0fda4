//! DeepSeek chat-completions provider
//!
//! DeepSeek exposes an OpenAI-compatible `/chat/completions` endpoint, so the
//! request and response shapes below follow that format.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::completion::{CompletionClient, CompletionRequest},
};

/// Connection settings for the completion service
///
/// Built once at start-up and handed to [`DeepSeekClient::new`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl From<&Config> for CompletionConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.deepseek_api_key.clone(),
            api_url: config.deepseek_api_url.clone(),
            model: config.deepseek_model.clone(),
            max_tokens: config.completion_max_tokens,
            temperature: config.completion_temperature,
            timeout: Duration::from_secs(config.completion_timeout_secs),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct DeepSeekClient {
    http_client: HttpClient,
    config: CompletionConfig,
}

impl DeepSeekClient {
    pub fn new(config: CompletionConfig) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'))
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                WireMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

/// Pulls the first choice's text out of a completion response
fn extract_content(response: ChatCompletionResponse) -> AppResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| AppError::ExternalService("DeepSeek returned no completion".to_string()))
}

#[async_trait::async_trait]
impl CompletionClient for DeepSeekClient {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "DeepSeek API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = extract_content(completion)?;

        tracing::info!(
            model = %self.config.model,
            chars = content.len(),
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "deepseek"
    }
}
