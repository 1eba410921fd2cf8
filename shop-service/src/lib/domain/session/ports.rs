use async_trait::async_trait;

use crate::domain::account::models::EmailAddress;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::IssuedTokens;
use crate::domain::session::models::RefreshRecord;

/// Port for login, refresh and logout.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify the password and issue an access/refresh pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown e-mail or wrong password
    /// * `DatabaseError` - Account lookup or refresh record storage failed
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<IssuedTokens, SessionError>;

    /// Exchange a stored, unexpired refresh credential for a new access
    /// credential. The refresh credential itself is returned unchanged.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Never issued, revoked, expired or forged
    /// * `DatabaseError` - Storage failed
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, SessionError>;

    /// Revoke a refresh credential. Succeeds whether or not it existed.
    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError>;
}

/// Durable record of issued refresh credentials.
///
/// Business outcomes are never errors here: only storage failures are.
#[async_trait]
pub trait RefreshStore: Send + Sync + 'static {
    /// Record `token` for `subject`, expiring one refresh TTL from now.
    async fn store(&self, subject: &str, token: &str) -> Result<RefreshRecord, SessionError>;

    /// True iff a record for exactly `token` exists and has not expired.
    async fn validate(&self, token: &str) -> Result<bool, SessionError>;

    /// Delete the record for `token`, if any.
    async fn invalidate(&self, token: &str) -> Result<(), SessionError>;
}

/// Persistence operations for refresh records.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    async fn insert(&self, record: RefreshRecord) -> Result<RefreshRecord, SessionError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshRecord>, SessionError>;

    /// Returns the number of records removed (0 or 1).
    async fn delete_by_token(&self, token: &str) -> Result<u64, SessionError>;
}
