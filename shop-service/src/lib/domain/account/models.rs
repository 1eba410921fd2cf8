use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::AccountIdError;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PersonNameError;
use crate::domain::account::errors::PhoneNumberError;
use crate::domain::account::errors::RoleError;

/// Account aggregate entity.
///
/// The e-mail is the natural key and the subject of issued credentials.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Guarded-create key for an e-mail.
    pub fn natural_key(email: &EmailAddress) -> String {
        format!("account:{}", email.as_str())
    }

    /// Capability tags carried in credentials.
    pub fn role_tags(&self) -> Vec<String> {
        vec![self.role.as_tag().to_string()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name: 2-50 characters, ASCII letters and spaces only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 50;

    /// # Errors
    /// * `TooShort` - Fewer than 2 characters after trimming
    /// * `TooLong` - More than 50 characters
    /// * `InvalidCharacters` - Anything other than letters and spaces
    pub fn new(name: String) -> Result<Self, PersonNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(PersonNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(PersonNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
            return Err(PersonNameError::InvalidCharacters);
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser and stored lowercased, so lookups and
/// guard keys are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_DIGITS: usize = 7;
    const MAX_DIGITS: usize = 20;

    /// # Errors
    /// * `InvalidFormat` - Not 7-20 digits with an optional leading '+'
    pub fn new(phone: String) -> Result<Self, PhoneNumberError> {
        let phone = phone.trim().to_string();
        let digits = phone.strip_prefix('+').unwrap_or(&phone);

        let valid = (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(PhoneNumberError::InvalidFormat {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An account has exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const ADMIN_TAG: &'static str = "ADMIN";
    pub const USER_TAG: &'static str = "USER";

    /// Tag embedded in credentials and matched by the route policy.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Role::Admin => Self::ADMIN_TAG,
            Role::User => Self::USER_TAG,
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    /// Accepts `admin`/`user`, with or without a `role_` prefix, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.strip_prefix("ROLE_").unwrap_or(&normalized) {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(RoleError::Unknown(normalized)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct SignUpCommand {
    pub role: Role,
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password: String,
}

/// Replacement contact details for an existing account.
#[derive(Debug)]
pub struct UpdateProfileCommand {
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
}
