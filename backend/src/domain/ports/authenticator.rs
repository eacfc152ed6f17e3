//! Driving port for password login.
//!
//! Inbound adapters call this port to check a password without knowing how
//! the hash is stored or compared, which keeps handler tests free of bcrypt.

use async_trait::async_trait;

use crate::domain::LifelogError;

/// Password authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Check `password` against the configured hash.
    async fn authenticate(&self, password: &str) -> Result<(), LifelogError>;
}
