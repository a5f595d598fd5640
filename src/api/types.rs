use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub story: String,
}

/// Field names match what the frontend diagnostics already expect.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    #[serde(rename = "hasOpenAIKey")]
    pub has_openai_key: bool,
    pub timestamp: String,
}
