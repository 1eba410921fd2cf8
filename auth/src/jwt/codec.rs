use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Duration;

use super::claims::Claims;
use super::claims::TokenKind;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Issues and verifies the signed credentials carrying identity and roles.
///
/// The signing secret is injected at construction and never mutated.
/// Verification and expiry are separate steps: [`CredentialCodec::verify`]
/// only proves the token was produced by this codec, [`Claims::is_expired_at`]
/// (or [`CredentialCodec::is_expired`]) decides whether it is still current.
pub struct CredentialCodec {
    handler: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl CredentialCodec {
    /// # Arguments
    /// * `secret` - HS256 secret, at least 32 bytes
    /// * `access_ttl` - Lifetime of access credentials
    /// * `refresh_ttl` - Lifetime of refresh credentials
    ///
    /// # Errors
    /// * `WeakSecret` - Secret too short
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, JwtError> {
        Ok(Self {
            handler: JwtHandler::new(secret)?,
            access_ttl,
            refresh_ttl,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Issue a short-lived access credential.
    pub fn issue_access<I, S>(&self, subject: &str, roles: I) -> Result<String, JwtError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue(subject, roles, TokenKind::Access, self.access_ttl)
    }

    /// Issue a long-lived refresh credential.
    pub fn issue_refresh<I, S>(&self, subject: &str, roles: I) -> Result<String, JwtError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue(subject, roles, TokenKind::Refresh, self.refresh_ttl)
    }

    fn issue<I, S>(&self, subject: &str, roles: I, kind: TokenKind, ttl: Duration) -> Result<String, JwtError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let claims = Claims::issue(subject, roles, kind, self.clock.now(), ttl);
        self.handler.encode(&claims)
    }

    /// Check signature and structure. Does not look at expiry.
    ///
    /// # Errors
    /// * `InvalidCredential` - Forged, tampered or malformed token
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.handler.decode(token)
    }

    /// Verify, then require the given kind and an unexpired window.
    ///
    /// # Errors
    /// * `InvalidCredential` - Forged, tampered or malformed token
    /// * `WrongKind` - Token kind differs from `kind`
    /// * `Expired` - Past its expiry
    pub fn verify_current(&self, token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let claims = self.verify(token)?;
        if claims.kind != kind {
            return Err(JwtError::WrongKind {
                expected: kind.as_str(),
            });
        }
        if claims.is_expired_at(self.clock.now()) {
            return Err(JwtError::Expired);
        }
        Ok(claims)
    }

    /// Whether a verified token is past its expiry.
    pub fn is_expired(&self, token: &str) -> Result<bool, JwtError> {
        Ok(self.verify(token)?.is_expired_at(self.clock.now()))
    }

    pub fn subject_of(&self, token: &str) -> Result<String, JwtError> {
        Ok(self.verify(token)?.sub)
    }

    pub fn roles_of(&self, token: &str) -> Result<BTreeSet<String>, JwtError> {
        Ok(self.verify(token)?.roles)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::jwt::clock::ManualClock;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn codec_with_clock() -> (CredentialCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(Utc::now()));
        let codec = CredentialCodec::new(SECRET, Duration::hours(1), Duration::days(1))
            .unwrap()
            .with_clock(clock.clone());
        (codec, clock)
    }

    /// Replace one character with a different base64url character.
    fn mutate_at(token: &str, index: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_issue_then_verify_returns_same_claims() {
        let (codec, _) = codec_with_clock();

        for (subject, roles) in [
            ("alice@example.com", vec!["ADMIN"]),
            ("bob@example.com", vec!["USER"]),
            ("carol@example.com", vec!["ADMIN", "USER"]),
            ("dave@example.com", vec![]),
        ] {
            let token = codec.issue_access(subject, roles.clone()).unwrap();
            let claims = codec.verify(&token).expect("freshly issued token must verify");

            assert_eq!(claims.subject(), subject);
            let expected: BTreeSet<String> = roles.into_iter().map(String::from).collect();
            assert_eq!(claims.roles(), &expected);
            assert_eq!(claims.kind, TokenKind::Access);
            assert_eq!(codec.subject_of(&token).unwrap(), subject);
            assert_eq!(codec.roles_of(&token).unwrap(), expected);
        }
    }

    #[test]
    fn test_single_byte_mutation_fails_verification() {
        let (codec, _) = codec_with_clock();
        let token = codec.issue_access("alice@example.com", ["ADMIN"]).unwrap();

        for index in 0..token.len() {
            let tampered = mutate_at(&token, index);
            assert!(
                codec.verify(&tampered).is_err(),
                "mutation at byte {} was accepted",
                index
            );
        }
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let (codec, _) = codec_with_clock();
        let other = CredentialCodec::new(
            b"a_completely_different_secret_value!",
            Duration::hours(1),
            Duration::days(1),
        )
        .unwrap();

        let token = other.issue_access("mallory@example.com", ["ADMIN"]).unwrap();
        assert!(matches!(codec.verify(&token), Err(JwtError::InvalidCredential(_))));
    }

    #[test]
    fn test_expiry_boundary() {
        let (codec, clock) = codec_with_clock();
        let token = codec.issue_access("alice@example.com", ["USER"]).unwrap();

        clock.advance(Duration::hours(1));
        assert!(!codec.is_expired(&token).unwrap());

        clock.advance(Duration::seconds(1));
        assert!(codec.is_expired(&token).unwrap());
        // Still verifies: expiry is a separate predicate.
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn test_refresh_outlives_access() {
        let (codec, clock) = codec_with_clock();
        let access = codec.issue_access("alice@example.com", ["USER"]).unwrap();
        let refresh = codec.issue_refresh("alice@example.com", ["USER"]).unwrap();

        clock.advance(Duration::hours(2));
        assert!(codec.is_expired(&access).unwrap());
        assert!(!codec.is_expired(&refresh).unwrap());
        assert_eq!(codec.verify(&refresh).unwrap().kind, TokenKind::Refresh);
    }

    #[test]
    fn test_verify_current() {
        let (codec, clock) = codec_with_clock();
        let refresh = codec.issue_refresh("alice@example.com", ["USER"]).unwrap();

        assert!(codec.verify_current(&refresh, TokenKind::Refresh).is_ok());
        assert_eq!(
            codec.verify_current(&refresh, TokenKind::Access),
            Err(JwtError::WrongKind { expected: "access" })
        );

        clock.advance(Duration::days(2));
        assert_eq!(
            codec.verify_current(&refresh, TokenKind::Refresh),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        let (codec, _) = codec_with_clock();

        assert!(matches!(codec.verify(""), Err(JwtError::InvalidCredential(_))));
        assert!(matches!(codec.is_expired("not-a-token"), Err(JwtError::InvalidCredential(_))));
    }
}
