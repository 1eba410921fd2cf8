use thiserror::Error;

use crate::domain::account::errors::AccountError;

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Unknown subject and wrong password are deliberately the same error.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Credential error: {0}")]
    Credential(#[from] auth::JwtError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::AuthenticationError> for SessionError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => SessionError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => SessionError::Password(e),
            auth::AuthenticationError::JwtError(e) => SessionError::Credential(e),
        }
    }
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        SessionError::Unknown(err.to_string())
    }
}
