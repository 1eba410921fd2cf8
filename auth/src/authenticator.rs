use std::sync::Arc;

use crate::jwt::CredentialCodec;
use crate::jwt::JwtError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and credential issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: Arc<CredentialCodec>,
}

/// Credentials minted by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    pub fn new(codec: Arc<CredentialCodec>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            codec,
        }
    }

    pub fn codec(&self) -> &Arc<CredentialCodec> {
        &self.codec
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password and issue an access/refresh pair for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Account identifier embedded as `sub`
    /// * `roles` - Capability tags embedded in both credentials
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash unreadable
    /// * `JwtError` - Signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        roles: &[String],
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(AuthenticationResult {
            access_token: self.codec.issue_access(subject, roles.iter().cloned())?,
            refresh_token: self.codec.issue_refresh(subject, roles.iter().cloned())?,
        })
    }

    /// Burn a decoy verification for a subject that does not exist and fail.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_decoy(password);
        AuthenticationError::InvalidCredentials
    }
}
