//! Password authentication service.
//!
//! The login password is never stored. A bcrypt hash is supplied through
//! configuration and compared off the async executor.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{Authenticator, PasswordVerifier};
use crate::domain::{LifelogError, PASSWORD_MAX, PASSWORD_MIN};

/// Service implementing the [`Authenticator`] driving port.
///
/// ## Invariants
/// - Length is checked before any hashing, so oversized inputs never reach
///   the verifier.
/// - A missing hash fails every login that passes the length check.
#[derive(Clone)]
pub struct AuthService<V> {
    verifier: Arc<V>,
    password_hash: Option<Zeroizing<String>>,
}

impl<V> AuthService<V> {
    /// Create a service comparing against `password_hash`, when configured.
    pub fn new(verifier: Arc<V>, password_hash: Option<Zeroizing<String>>) -> Self {
        Self {
            verifier,
            password_hash,
        }
    }
}

#[async_trait]
impl<V> Authenticator for AuthService<V>
where
    V: PasswordVerifier + 'static,
{
    async fn authenticate(&self, password: &str) -> Result<(), LifelogError> {
        let len = password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
            return Err(LifelogError::PasswordLength);
        }
        let Some(hash) = self.password_hash.clone() else {
            return Err(LifelogError::HashNotFound);
        };

        let verifier = Arc::clone(&self.verifier);
        let password = Zeroizing::new(password.to_owned());
        let matched = tokio::task::spawn_blocking(move || verifier.verify(&password, &hash))
            .await
            .map_err(|err| LifelogError::Internal(format!("password check aborted: {err}")))??;

        if matched {
            info!("login accepted");
            Ok(())
        } else {
            debug!("login rejected");
            Err(LifelogError::IncorrectCredentials)
        }
    }
}
