//! Port for issuing and checking bearer tokens.
//!
//! Sessions are stateless: a login yields a short-lived access token and a
//! longer-lived refresh token, each signed with its own secret. A refresh
//! token is only good for minting a new access token, and an access token is
//! never accepted in its place.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Token was malformed, expired, of the wrong kind, or badly signed.
        Invalid { message: String } => "invalid token: {message}",
        /// No refresh secret is configured.
        MissingRefreshSecret => "refresh token secret is not configured",
        /// Signing a token failed.
        Signing { message: String } => "failed to sign token: {message}",
    }
}

/// Freshly issued access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token.
    pub at: String,
    /// Refresh token.
    pub rt: String,
}

/// Token signing and verification.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a new access and refresh token pair.
    fn issue_pair(&self) -> Result<TokenPair, TokenError>;

    /// Exchange a refresh token for a new access token.
    fn refresh(&self, refresh_token: &str) -> Result<Zeroizing<String>, TokenError>;

    /// Check an access token presented as a bearer credential.
    fn verify_access(&self, access_token: &str) -> Result<(), TokenError>;
}
