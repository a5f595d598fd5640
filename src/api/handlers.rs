use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use tracing::{error, info};

use crate::{
    api::types::{GenerateRequest, GenerateResponse, HealthResponse},
    api::AppState,
    error::ApiError,
    prompts,
};

/// Returned with a 200 when the provider answers without any usable
/// completion text. The client treats it like any other story.
const PLACEHOLDER_STORY: &str = "No story generated";

pub async fn generate_story(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    // Credential check comes first: a misconfigured deployment must not
    // leak requests upstream.
    if !state.config.has_credential() {
        return Err(ApiError::Configuration);
    }

    let request: GenerateRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::Validation("Invalid request body".into()))?;

    if request.prompt.trim().is_empty() {
        return Err(ApiError::Validation("Prompt must not be empty".into()));
    }

    info!(prompt_len = request.prompt.len(), "generating story");

    let content = state
        .backend
        .complete(prompts::STORY_SYSTEM_PROMPT, &request.prompt)
        .await
        .map_err(|err| {
            error!("upstream call failed: {err}");
            ApiError::Upstream(err.to_string())
        })?;

    let story = content.unwrap_or_else(|| PLACEHOLDER_STORY.to_string());
    info!(story_len = story.len(), "story generated");

    Ok(Json(GenerateResponse { story }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "API routes are working",
        has_openai_key: state.config.has_credential(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::config::Config;
    use crate::openai::{StoryBackend, UpstreamError};

    enum Reply {
        Content(&'static str),
        Empty,
        Fail(&'static str),
    }

    struct ScriptedBackend {
        reply: Reply,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedBackend {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_user_prompt(&self) -> Option<String> {
            self.seen
                .lock()
                .unwrap()
                .last()
                .map(|(_, user)| user.clone())
        }
    }

    #[async_trait]
    impl StoryBackend for ScriptedBackend {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
        ) -> Result<Option<String>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));
            match self.reply {
                Reply::Content(text) => Ok(Some(text.to_string())),
                Reply::Empty => Ok(None),
                Reply::Fail(message) => Err(UpstreamError::Provider(message.to_string())),
            }
        }
    }

    fn state_with(api_key: Option<&str>, backend: Arc<ScriptedBackend>) -> AppState {
        AppState {
            config: Arc::new(Config {
                openai_api_key: api_key.map(Into::into),
                openai_base_url: "http://localhost:9".into(),
                model: "gpt-test".into(),
                bind_addr: "127.0.0.1:0".into(),
            }),
            backend,
        }
    }

    fn body(raw: &str) -> Bytes {
        Bytes::copy_from_slice(raw.as_bytes())
    }

    #[tokio::test]
    async fn returns_story_from_first_choice() {
        let backend = ScriptedBackend::new(Reply::Content("Title: X"));
        let state = state_with(Some("sk-test"), backend.clone());

        let response = generate_story(State(state), body(r#"{"prompt":"add port calls"}"#))
            .await
            .unwrap();

        assert_eq!(response.0.story, "Title: X");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn empty_choices_yield_placeholder_story() {
        let backend = ScriptedBackend::new(Reply::Empty);
        let state = state_with(Some("sk-test"), backend);

        let response = generate_story(State(state), body(r#"{"prompt":"add port calls"}"#))
            .await
            .unwrap();

        assert!(!response.0.story.is_empty());
        assert_eq!(response.0.story, PLACEHOLDER_STORY);
    }

    #[tokio::test]
    async fn missing_credential_is_500_without_upstream_call() {
        let backend = ScriptedBackend::new(Reply::Content("never"));
        let state = state_with(None, backend.clone());

        let err = generate_story(State(state), body(r#"{"prompt":"add port calls"}"#))
            .await
            .unwrap_err();

        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn unparseable_body_is_400() {
        let backend = ScriptedBackend::new(Reply::Content("never"));
        let state = state_with(Some("sk-test"), backend.clone());

        let err = generate_story(State(state), body("not json"))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn blank_prompt_is_400() {
        let backend = ScriptedBackend::new(Reply::Content("never"));
        let state = state_with(Some("sk-test"), backend.clone());

        let err = generate_story(State(state), body(r#"{"prompt":"   "}"#))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_500_with_provider_message() {
        let backend = ScriptedBackend::new(Reply::Fail("Rate limit reached"));
        let state = state_with(Some("sk-test"), backend);

        let err = generate_story(State(state), body(r#"{"prompt":"add port calls"}"#))
            .await
            .unwrap_err();

        match &err {
            ApiError::Upstream(message) => assert!(message.contains("Rate limit reached")),
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn prompt_reaches_backend_byte_for_byte() {
        let backend = ScriptedBackend::new(Reply::Content("ok"));
        let state = state_with(Some("sk-test"), backend.clone());

        let prompt = "Add port call — étape 1\nwith a second line";
        let raw = serde_json::to_string(&serde_json::json!({ "prompt": prompt })).unwrap();

        generate_story(State(state), body(&raw)).await.unwrap();

        assert_eq!(backend.last_user_prompt().as_deref(), Some(prompt));
    }

    #[tokio::test]
    async fn health_reports_credential_presence() {
        let with_key = state_with(Some("sk-test"), ScriptedBackend::new(Reply::Empty));
        let without_key = state_with(None, ScriptedBackend::new(Reply::Empty));

        assert!(health(State(with_key)).await.0.has_openai_key);
        assert!(!health(State(without_key)).await.0.has_openai_key);
    }
}
