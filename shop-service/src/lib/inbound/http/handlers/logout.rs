use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::refresh::RefreshRequest;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .session_service
        .logout(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Logged out successfully")))
}
