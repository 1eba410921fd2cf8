use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::sign_up::AccountData;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::PersonName;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::UpdateProfileCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentIdentity;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating contact details (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl UpdateAccountRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, AccountError> {
        Ok(UpdateProfileCommand {
            name: PersonName::new(self.name)?,
            email: EmailAddress::new(self.email)?,
            phone: PhoneNumber::new(self.phone)?,
        })
    }
}

pub async fn update_account(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let account_id = AccountId::from_string(&id).map_err(AccountError::from)?;
    let command = req.try_into_command()?;

    state
        .account_service
        .update_profile(&account_id, &identity, command)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}
