use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// Sampling parameters are fixed: bounded output, moderate temperature so
// repeated prompts may phrase the same story differently.
const MAX_TOKENS: u16 = 1000;
const TEMPERATURE: f32 = 0.7;

// Covers the whole upstream exchange; there is no retry after it fires.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("OpenAI API error: {0}")]
    Provider(String),
    #[error("Failed to generate user story. Please check your API key and try again.")]
    Transport(#[from] reqwest::Error),
}

/// The one seam between the proxy and the completion provider. Handlers
/// only see "some text came back" (`Ok(Some)`), "the provider answered
/// with no usable content" (`Ok(None)`) or a failure.
#[async_trait]
pub trait StoryBackend: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Option<String>, UpstreamError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u16,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ProviderError,
}

#[derive(Deserialize)]
struct ProviderError {
    message: String,
}

pub struct OpenAiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(base_url: String, api_key: String, model: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl StoryBackend for OpenAiBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Option<String>, UpstreamError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: system_prompt,
                    },
                    ChatMessage {
                        role: "user",
                        content: user_prompt,
                    },
                ],
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            let completion = response.json::<ChatCompletion>().await?;
            debug!(choices = completion.choices.len(), "completion received");
            Ok(completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content))
        } else {
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => format!("upstream returned {status}"),
            };
            Err(UpstreamError::Provider(message))
        }
    }
}
