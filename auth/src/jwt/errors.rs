use thiserror::Error;

/// Error type for credential operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign credential: {0}")]
    EncodingFailed(String),

    /// Signature or structure check failed. Deliberately coarse: callers must not
    /// be able to tell a forged token from a truncated one.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Credential is expired")]
    Expired,

    #[error("Credential is not a {expected} credential")]
    WrongKind { expected: &'static str },

    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },
}
