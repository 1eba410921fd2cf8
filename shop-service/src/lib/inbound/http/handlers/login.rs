use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::EmailAddress;
use crate::domain::session::models::IssuedTokens;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    // A malformed e-mail cannot belong to any account.
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    state
        .session_service
        .login(&email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::OK, TokenData::issued(tokens, "Login successful")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Token pair returned by login and refresh.
///
/// Every field but `message` is null when a refresh is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub subject: Option<String>,
    pub user_name: Option<String>,
    pub message: String,
}

impl TokenData {
    pub fn issued(tokens: IssuedTokens, message: &str) -> Self {
        Self {
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            subject: Some(tokens.subject),
            user_name: Some(tokens.user_name),
            message: message.to_string(),
        }
    }

    pub fn refused(message: &str) -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            subject: None,
            user_name: None,
            message: message.to_string(),
        }
    }
}
