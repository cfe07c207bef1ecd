use axum::Json;

use crate::error::MessageBody;

pub const PREFLIGHT_MESSAGE: &str = "CORS preflight request handled successfully";

/// Answers browser preflight requests. The CORS headers themselves are set
/// by the router for every response.
pub async fn preflight() -> Json<MessageBody> {
    Json(MessageBody {
        message: PREFLIGHT_MESSAGE.to_string(),
    })
}
