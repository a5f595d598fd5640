use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storyforge::api::{self, AppState};
use storyforge::config::Config;
use storyforge::openai::OpenAiBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    if !config.has_credential() {
        tracing::warn!("OPENAI_API_KEY is not set; /api/generate-story will reject requests");
    }

    let backend = Arc::new(OpenAiBackend::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone().unwrap_or_default(),
        config.model.clone(),
    )?);

    let state = AppState {
        config: config.clone(),
        backend,
    };

    let app = Router::new()
        .merge(api::router())
        // CORS for the browser frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state);

    let addr = config.bind_addr.clone();

    println!("🚀 Starting story generator server...");
    println!("🌐 HTTP listening on http://{addr}");
    println!("📝 Generation endpoint at http://{addr}/api/generate-story");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
