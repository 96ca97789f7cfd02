//! `/assistant`

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::gemini::SYSTEM_PROMPT;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    #[serde(rename = "userPrompt")]
    pub user_prompt: String,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<Value>, ApiError> {
    let assistant = state
        .assistant
        .as_ref()
        .ok_or(ApiError::AssistantUnavailable)?;

    if request.user_prompt.trim().is_empty() {
        return Err(ApiError::bad_request("userPrompt must not be empty"));
    }

    let answer = assistant
        .ask(SYSTEM_PROMPT, &request.user_prompt)
        .await
        .map_err(ApiError::Assistant)?;

    Ok(Json(json!({ "response": answer })))
}
