use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::MessageBody;
use crate::routes::{preflight, turn};
use crate::state::AppState;

/// Requests on paths with no explicit route. The endpoint is usually
/// mounted under a stage or resource prefix, so a preflight or a turn is
/// served on any path.
pub async fn fallback(method: Method, state: State<AppState>, body: Bytes) -> Response {
    match method {
        Method::OPTIONS => preflight::preflight().await.into_response(),
        Method::POST => turn::handle_turn(state, body).await.into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(MessageBody {
                message: "Not found".to_string(),
            }),
        )
            .into_response(),
    }
}
