use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::PersonName;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::Role;
use crate::domain::account::models::SignUpCommand;
use crate::inbound::http::middleware::CurrentIdentity;
use crate::inbound::http::policy::AccessDenied;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    identity: Option<CurrentIdentity>,
    Path(role): Path<String>,
    Json(body): Json<SignUpRequest>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let command = body.try_into_command(&role)?;

    // Role spelling is lenient ("Admin", "ROLE_ADMIN"), so the route table
    // alone cannot pin admin registration down.
    if command.role == Role::Admin {
        match identity {
            None => return Err(AccessDenied::Unauthenticated.into()),
            Some(CurrentIdentity(actor)) if !actor.has_role(Role::ADMIN_TAG) => {
                return Err(AccessDenied::Forbidden.into())
            }
            Some(_) => {}
        }
    }

    state
        .account_service
        .sign_up(command)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    name: String,
    email: String,
    phone: String,
    password: String,
}

impl SignUpRequest {
    fn try_into_command(self, role: &str) -> Result<SignUpCommand, AccountError> {
        Ok(SignUpCommand {
            role: role.parse::<Role>()?,
            name: PersonName::new(self.name)?,
            email: EmailAddress::new(self.email)?,
            phone: PhoneNumber::new(self.phone)?,
            password: self.password,
        })
    }
}

/// Account as exposed over HTTP. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.to_string(),
            email: account.email.to_string(),
            phone: account.phone.to_string(),
            role: account.role.to_string(),
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        }
    }
}
