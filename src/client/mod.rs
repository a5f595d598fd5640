//! Terminal-side counterpart of the story endpoint: a small state machine
//! holding the prompt text, the last result and the transient UI flags,
//! with the network, clipboard and notification seams injected so the
//! whole thing runs deterministically under test.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::time::{Duration, Instant};

const COPIED_RESET: Duration = Duration::from_millis(2000);

#[derive(Debug, Error)]
pub enum ClientError {
    /// The proxy answered with an `{ error }` body.
    #[error("{0}")]
    Server(String),
    /// The call to the proxy itself did not complete.
    #[error("Failed to generate user story")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait StoryApi {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError>;
}

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Transient user feedback, rendered by the binary as toast-style lines.
#[derive(Debug, PartialEq, Eq)]
pub enum Notice {
    EmptyPrompt,
    StoryReady,
    GenerationFailed(String),
    Copied,
    CopyFailed(String),
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

pub struct PromptClient<A, C, N> {
    api: A,
    clipboard: C,
    notifier: N,
    prompt_text: String,
    result_text: String,
    is_busy: bool,
    // Deadline form of the "copied" flag: a second copy before expiry
    // pushes the deadline out instead of stacking timers.
    copied_until: Option<Instant>,
}

impl<A: StoryApi, C: Clipboard, N: Notifier> PromptClient<A, C, N> {
    pub fn new(api: A, clipboard: C, notifier: N) -> Self {
        Self {
            api,
            clipboard,
            notifier,
            prompt_text: String::new(),
            result_text: String::new(),
            is_busy: false,
            copied_until: None,
        }
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt_text = text.into();
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    pub fn is_copied(&self) -> bool {
        self.copied_until
            .is_some_and(|deadline| Instant::now() < deadline)
    }

    /// Validates and flips the state into "one generation in flight".
    /// Returns the prompt to send, or `None` when nothing should happen
    /// (blank prompt, or a generation already running).
    fn begin_submit(&mut self) -> Option<String> {
        if self.is_busy {
            return None;
        }
        if self.prompt_text.trim().is_empty() {
            self.notifier.notify(Notice::EmptyPrompt);
            return None;
        }
        self.is_busy = true;
        self.result_text.clear();
        self.copied_until = None;
        Some(self.prompt_text.clone())
    }

    fn finish_submit(&mut self, outcome: Result<String, ClientError>) {
        self.is_busy = false;
        match outcome {
            Ok(story) => {
                self.result_text = story;
                self.notifier.notify(Notice::StoryReady);
            }
            Err(err) => self.notifier.notify(Notice::GenerationFailed(err.to_string())),
        }
    }

    pub async fn submit(&mut self) {
        let Some(prompt) = self.begin_submit() else {
            return;
        };
        let outcome = self.api.generate(&prompt).await;
        self.finish_submit(outcome);
    }

    /// Enter submits; Enter with a modifier held inserts a newline.
    pub async fn handle_enter(&mut self, modifier_held: bool) {
        if modifier_held {
            self.prompt_text.push('\n');
        } else {
            self.submit().await;
        }
    }

    pub fn copy(&mut self) {
        if self.result_text.is_empty() {
            return;
        }
        let text = self.result_text.clone();
        match self.clipboard.set_text(&text) {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + COPIED_RESET);
                self.notifier.notify(Notice::Copied);
            }
            Err(err) => self.notifier.notify(Notice::CopyFailed(err.to_string())),
        }
    }
}

/// `{ story }` or `{ error }`, never both; tolerate either being absent
/// so a malformed server response degrades to the fallback message.
#[derive(Deserialize)]
struct GenerationOutcome {
    story: Option<String>,
    error: Option<String>,
}

pub struct HttpStoryApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStoryApi {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(40))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/generate-story", self.base_url))
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await?;

        let status = response.status();
        let outcome = response.json::<GenerationOutcome>().await?;

        if status.is_success() {
            if let Some(story) = outcome.story {
                return Ok(story);
            }
        }
        Err(ClientError::Server(outcome.error.unwrap_or_else(|| {
            "Failed to generate user story".to_string()
        })))
    }
}
