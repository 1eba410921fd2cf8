use std::collections::BTreeSet;

use auth::Claims;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// Request-scoped authenticated identity.
///
/// Only ever built from a verified access credential, never from request
/// input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
        }
    }
}

/// Server-side record of an issued refresh credential.
///
/// Several may coexist for one subject (one per login).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRecord {
    pub id: Uuid,
    pub subject: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshRecord {
    /// Live iff `now` is strictly before the expiry instant.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Credentials handed back by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub subject: String,
    pub user_name: String,
}
