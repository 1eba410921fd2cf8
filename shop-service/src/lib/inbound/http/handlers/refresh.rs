use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use super::login::TokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::errors::SessionError;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a new access token.
///
/// A refused refresh still answers with the token envelope, all token
/// fields null, so clients can parse one shape.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Response, ApiError> {
    match state.session_service.refresh(&body.refresh_token).await {
        Ok(tokens) => Ok(
            ApiSuccess::new(StatusCode::OK, TokenData::issued(tokens, "Token refreshed"))
                .into_response(),
        ),
        Err(SessionError::InvalidRefreshToken) => Ok(ApiSuccess::new(
            StatusCode::UNAUTHORIZED,
            TokenData::refused("Invalid refresh token"),
        )
        .into_response()),
        Err(e) => Err(ApiError::from(e)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
