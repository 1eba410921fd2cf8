use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Argon2id password hashing.
///
/// Keeps a pre-computed decoy hash so a login for an unknown account costs
/// the same as a login with a wrong password.
pub struct PasswordHasher {
    decoy_hash: Option<String>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        let decoy_hash = Argon2::default()
            .hash_password(b"decoy-password", &SaltString::generate(&mut OsRng))
            .map(|hash| hash.to_string())
            .ok();

        Self { decoy_hash }
    }

    /// Hash a plaintext password into PHC string format.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash cannot be parsed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Spend one verification on the decoy hash. Always "fails".
    pub fn verify_decoy(&self, password: &str) {
        if let Some(decoy) = &self.decoy_hash {
            let _ = self.verify(password, decoy);
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
