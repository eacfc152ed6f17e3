//! Start-up configuration.
//!
//! Secrets come from the environment through [`mockable::Env`] so they can be
//! faked in tests; the listener and storage block is loaded with OrthoConfig.

mod auth;
mod server;

pub use auth::{
    ACCESS_SECRET_ENV, AuthConfigError, AuthSettings, PASSWORD_HASH_ENV, REFRESH_SECRET_ENV,
    auth_settings_from_env,
};
pub use server::{DEFAULT_BIND_ADDR, ServerSettings};
