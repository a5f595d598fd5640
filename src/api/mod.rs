use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub mod handlers;
pub mod types;

use crate::{config::Config, openai::StoryBackend};
use handlers::{generate_story, health};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn StoryBackend>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/generate-story", post(generate_story))
        .route("/api/test", get(health))
}
