use thiserror::Error;

use crate::domain::guard::DuplicateKey;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for PersonName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Name is not valid, please enter letters and spaces")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Phone number must be {min}-{max} digits with an optional leading '+'")]
    InvalidFormat { min: usize, max: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("There is no role for '{0}', role must be 'user' or 'admin'")]
    Unknown(String),
}

/// Top-level error for all account-related operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] PersonNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid phone: {0}")]
    InvalidPhone(#[from] PhoneNumberError),

    #[error("{0}")]
    UnknownRole(#[from] RoleError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("{0} is already exists")]
    EmailAlreadyExists(String),

    #[error("{0} is already exists")]
    PhoneAlreadyExists(String),

    #[error("{0} is same with your old email")]
    SameEmail(String),

    #[error("{0} is same with your old phone number")]
    SamePhone(String),

    #[error("You can only update your own account")]
    NotOwner,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<DuplicateKey> for AccountError {
    fn from(err: DuplicateKey) -> Self {
        let email = err.0.strip_prefix("account:").unwrap_or(&err.0);
        AccountError::EmailAlreadyExists(email.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}
