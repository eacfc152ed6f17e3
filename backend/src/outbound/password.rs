//! bcrypt adapter for the [`PasswordVerifier`] port.

use crate::domain::ports::{PasswordVerifier, PasswordVerifierError};

/// Verifier comparing passwords against bcrypt hashes.
#[derive(Debug, Default, Clone, Copy)]
pub struct BcryptVerifier;

impl PasswordVerifier for BcryptVerifier {
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordVerifierError> {
        bcrypt::verify(password, hash)
            .map_err(|err| PasswordVerifierError::malformed_hash(err.to_string()))
    }
}
