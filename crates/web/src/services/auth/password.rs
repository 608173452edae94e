//! Password hashing.
//!
//! Handlers never touch a hashing algorithm directly; they go through the
//! [`CredentialHasher`] capability so the algorithm can be swapped.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use super::AuthError;

/// One-way salted password hashing and verification.
///
/// Both operations are CPU-bound; async callers should run them on the
/// blocking thread pool.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing hash string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the stored hash cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// Do the work of a failed `verify` when there is no stored hash.
    ///
    /// Called for unknown usernames so they cost as much as a wrong password.
    fn verify_absent(&self, password: &str);
}

/// Salt of the placeholder hash checked by [`CredentialHasher::verify_absent`].
const ABSENT_SALT: &str = "bGF0Y2hrZXktYWJzZW50";

/// 32 zero bytes; no password produces this output.
const ABSENT_OUTPUT: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Argon2id with the crate's default parameters.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    absent_hash: String,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl Argon2Hasher {
    /// Create a hasher with default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an Argon2id hasher with explicit cost parameters.
    ///
    /// Hashes record their own parameters, so hashes made with other
    /// parameters still verify.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let absent_hash = format!(
            "$argon2id$v=19$m={},t={},p={}${ABSENT_SALT}${ABSENT_OUTPUT}",
            params.m_cost(),
            params.t_cost(),
            params.p_cost(),
        );

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            absent_hash,
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHash(e.to_string())),
        }
    }

    fn verify_absent(&self, password: &str) {
        if let Err(e) = self.verify(password, &self.absent_hash) {
            tracing::warn!(error = %e, "Placeholder hash failed to verify");
        }
    }
}
