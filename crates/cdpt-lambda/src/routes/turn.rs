use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use cdpt_pipeline::orchestrator::{Rejection, TurnInput, TurnOutcome};

use crate::error::ApiError;
use crate::state::AppState;

pub const INVALID_INPUT_MESSAGE: &str =
    "Invalid input detected. Please ask a question related to Cardano development.";
pub const INAPPROPRIATE_RESPONSE_MESSAGE: &str =
    "The response contains inappropriate content. Please rephrase your question.";

const UNKNOWN_USER: &str = "unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    #[serde(default)]
    pub input_transcript: Option<String>,
    pub initial_contact_id: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_title: Option<String>,
}

/// Run one conversational turn.
///
/// The body is parsed by hand rather than through the `Json` extractor so
/// callers that omit `Content-Type` are still served.
pub async fn handle_turn(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TurnResponse>, ApiError> {
    let req: TurnRequest = serde_json::from_slice(&body)?;

    let username = req
        .username
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_USER.to_string());

    let outcome = state
        .orchestrator
        .process_turn(TurnInput {
            conversation_id: req.initial_contact_id,
            username,
            transcript: req.input_transcript,
        })
        .await?;

    match outcome {
        TurnOutcome::Responded(reply) => Ok(Json(TurnResponse {
            message: reply.message,
            category_title: reply.category_title,
        })),
        TurnOutcome::Rejected(Rejection::Input { .. }) => {
            Err(ApiError::BadRequest(INVALID_INPUT_MESSAGE.to_string()))
        }
        TurnOutcome::Rejected(Rejection::Output { .. }) => {
            Err(ApiError::BadRequest(INAPPROPRIATE_RESPONSE_MESSAGE.to_string()))
        }
    }
}
