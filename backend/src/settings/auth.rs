//! Authentication secrets read once at start-up.

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

pub const PASSWORD_HASH_ENV: &str = "LIFELOG_PASSWORD_HASH";
pub const ACCESS_SECRET_ENV: &str = "LIFELOG_ACCESS_SECRET";
pub const REFRESH_SECRET_ENV: &str = "LIFELOG_REFRESH_SECRET";

/// Secrets injected into the auth service and token issuer.
///
/// Only the access secret is mandatory. A missing password hash makes every
/// login fail with an internal error; a missing refresh secret does the same
/// for login and refresh.
pub struct AuthSettings {
    pub password_hash: Option<Zeroizing<String>>,
    pub access_secret: Zeroizing<String>,
    pub refresh_secret: Option<Zeroizing<String>>,
}

/// Errors raised while reading authentication settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
}

/// Read authentication settings from `env`. Blank values count as unset.
///
/// # Examples
///
/// ```rust
/// use lifelog_backend::settings::auth_settings_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "LIFELOG_ACCESS_SECRET" => Some("access".to_owned()),
///     _ => None,
/// });
///
/// let settings = auth_settings_from_env(&env).expect("access secret present");
/// assert!(settings.password_hash.is_none());
/// ```
pub fn auth_settings_from_env<E: Env>(env: &E) -> Result<AuthSettings, AuthConfigError> {
    let access_secret = secret(env, ACCESS_SECRET_ENV).ok_or(AuthConfigError::MissingEnv {
        name: ACCESS_SECRET_ENV,
    })?;
    let password_hash = secret(env, PASSWORD_HASH_ENV);
    if password_hash.is_none() {
        warn!("{PASSWORD_HASH_ENV} not set; every login will fail");
    }
    let refresh_secret = secret(env, REFRESH_SECRET_ENV);
    if refresh_secret.is_none() {
        warn!("{REFRESH_SECRET_ENV} not set; login and refresh will fail");
    }

    Ok(AuthSettings {
        password_hash,
        access_secret,
        refresh_secret,
    })
}

fn secret<E: Env>(env: &E, name: &str) -> Option<Zeroizing<String>> {
    env.string(name)
        .map(Zeroizing::new)
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(vars: &'static [(&'static str, &'static str)]) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        });
        env
    }

    #[rstest]
    fn reads_every_secret() {
        let env = env_with(&[
            (PASSWORD_HASH_ENV, "$2b$04$hash"),
            (ACCESS_SECRET_ENV, "access"),
            (REFRESH_SECRET_ENV, "refresh"),
        ]);

        let settings = auth_settings_from_env(&env).expect("settings load");

        assert_eq!(settings.password_hash.as_deref().map(String::as_str), Some("$2b$04$hash"));
        assert_eq!(settings.access_secret.as_str(), "access");
        assert_eq!(settings.refresh_secret.as_deref().map(String::as_str), Some("refresh"));
    }

    #[rstest]
    #[case(&[])]
    #[case(&[(ACCESS_SECRET_ENV, "   ")])]
    fn access_secret_is_required(#[case] vars: &'static [(&'static str, &'static str)]) {
        let env = env_with(vars);

        let err = auth_settings_from_env(&env).err().expect("missing access secret");

        assert_eq!(
            err,
            AuthConfigError::MissingEnv {
                name: ACCESS_SECRET_ENV
            }
        );
    }

    #[rstest]
    fn optional_secrets_may_be_blank() {
        let env = env_with(&[
            (ACCESS_SECRET_ENV, "access"),
            (PASSWORD_HASH_ENV, ""),
        ]);

        let settings = auth_settings_from_env(&env).expect("settings load");

        assert!(settings.password_hash.is_none());
        assert!(settings.refresh_secret.is_none());
    }
}
