use std::collections::BTreeSet;
use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// What a credential may be used for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, presented as a bearer credential on API calls.
    Access,
    /// Long-lived, server-tracked, only exchanged for new access credentials.
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity claims embedded in a signed credential.
///
/// Never persisted; rebuilt from a verified token on every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (unique account identifier, the account e-mail)
    pub sub: String,

    /// Capability tags granted to the subject
    pub roles: BTreeSet<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Credential identifier, unique per issuance
    pub jti: String,

    pub kind: TokenKind,
}

impl Claims {
    /// Create claims issued at `now` that stay valid for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Account identifier
    /// * `roles` - Capability tags
    /// * `kind` - Access or refresh
    /// * `now` - Issue instant
    /// * `ttl` - Lifetime, `exp = now + ttl`
    pub fn issue<I, S>(
        subject: impl Into<String>,
        roles: I,
        kind: TokenKind,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sub: subject.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Check if token is expired.
    ///
    /// A credential is still accepted at exactly `exp` and rejected strictly after.
    /// Timestamps are whole seconds, so sub-second parts of the issue instant are
    /// truncated and a credential may outlive its nominal TTL by under a second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.is_expired(now.timestamp())
    }
}
