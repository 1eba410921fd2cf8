//! Credential and password primitives for the shop back office.
//!
//! - Password hashing (Argon2id)
//! - Signed access/refresh credentials carrying a subject and role set
//! - Login coordination (verify password, mint a credential pair)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Credentials
//! ```
//! use auth::CredentialCodec;
//! use chrono::Duration;
//!
//! let codec = CredentialCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(1),
//!     Duration::days(1),
//! )
//! .unwrap();
//!
//! let token = codec.issue_access("alice@example.com", ["ADMIN"]).unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.subject(), "alice@example.com");
//! assert!(!codec.is_expired(&token).unwrap());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::CredentialCodec;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::ManualClock;
pub use jwt::SystemClock;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
