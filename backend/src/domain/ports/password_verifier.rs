//! Port for comparing a password against a stored hash.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password verifiers.
    pub enum PasswordVerifierError {
        /// The configured hash could not be parsed.
        MalformedHash { message: String } => "malformed password hash: {message}",
    }
}

/// Password hash comparison.
///
/// Implementations may be slow on purpose; callers run them off the async
/// executor.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    /// Whether `password` matches `hash`.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordVerifierError>;
}
