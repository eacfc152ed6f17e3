//! HS256 JSON Web Token adapter for the [`TokenService`] port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so tests can move time forward deterministically.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenPair, TokenService};

/// Access token lifetime in seconds.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;
/// Refresh token lifetime in seconds.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

/// Single-user service, so every token names the same subject.
const SUBJECT: &str = "lifelog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    kind: TokenKind,
    iat: i64,
    exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Token service signing access and refresh tokens with separate secrets.
pub struct JwtTokenService {
    access: Keys,
    refresh: Option<Keys>,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build the service. Without a refresh secret, issuing and refreshing
    /// fail with [`TokenError::MissingRefreshSecret`] while bearer checks
    /// keep working.
    pub fn new(access_secret: &[u8], refresh_secret: Option<&[u8]>, clock: Arc<dyn Clock>) -> Self {
        Self {
            access: Keys::from_secret(access_secret),
            refresh: refresh_secret.map(Keys::from_secret),
            clock,
        }
    }

    fn refresh_keys(&self) -> Result<&Keys, TokenError> {
        self.refresh
            .as_ref()
            .ok_or_else(TokenError::missing_refresh_secret)
    }

    fn sign(&self, keys: &Keys, kind: TokenKind, ttl_secs: i64) -> Result<String, TokenError> {
        let iat = self.clock.utc().timestamp();
        let claims = Claims {
            sub: SUBJECT.to_owned(),
            kind,
            iat,
            exp: iat + ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn check(&self, keys: &Keys, token: &str, kind: TokenKind) -> Result<(), TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?
            .claims;
        if claims.kind != kind {
            return Err(TokenError::invalid("wrong token kind"));
        }
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::invalid("token expired"));
        }
        Ok(())
    }
}

impl TokenService for JwtTokenService {
    fn issue_pair(&self) -> Result<TokenPair, TokenError> {
        let refresh = self.refresh_keys()?;
        Ok(TokenPair {
            at: self.sign(&self.access, TokenKind::Access, ACCESS_TOKEN_TTL_SECS)?,
            rt: self.sign(refresh, TokenKind::Refresh, REFRESH_TOKEN_TTL_SECS)?,
        })
    }

    fn refresh(&self, refresh_token: &str) -> Result<Zeroizing<String>, TokenError> {
        let keys = self.refresh_keys()?;
        self.check(keys, refresh_token, TokenKind::Refresh)?;
        self.sign(&self.access, TokenKind::Access, ACCESS_TOKEN_TTL_SECS)
            .map(Zeroizing::new)
    }

    fn verify_access(&self, access_token: &str) -> Result<(), TokenError> {
        self.check(&self.access, access_token, TokenKind::Access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn service_at(at: DateTime<Utc>) -> JwtTokenService {
        JwtTokenService::new(
            b"access-secret",
            Some(b"refresh-secret".as_slice()),
            Arc::new(FixtureClock(at)),
        )
    }

    #[fixture]
    fn service() -> JwtTokenService {
        service_at(start())
    }

    #[rstest]
    fn issued_tokens_verify_for_their_own_kind(service: JwtTokenService) {
        let pair = service.issue_pair().expect("issue pair");
        service.verify_access(&pair.at).expect("access accepted");
        let fresh = service.refresh(&pair.rt).expect("refresh accepted");
        service.verify_access(&fresh).expect("new access accepted");
    }

    #[rstest]
    fn tokens_are_not_interchangeable(service: JwtTokenService) {
        let pair = service.issue_pair().expect("issue pair");
        assert!(matches!(
            service.refresh(&pair.at),
            Err(TokenError::Invalid { .. })
        ));
        assert!(matches!(
            service.verify_access(&pair.rt),
            Err(TokenError::Invalid { .. })
        ));
    }

    #[test]
    fn kind_is_checked_even_with_shared_secret() {
        let service = JwtTokenService::new(
            b"same",
            Some(b"same".as_slice()),
            Arc::new(FixtureClock(start())),
        );
        let pair = service.issue_pair().expect("issue pair");
        assert_eq!(
            service.refresh(&pair.at).map(|_| ()),
            Err(TokenError::invalid("wrong token kind"))
        );
    }

    #[rstest]
    #[case(TimeDelta::minutes(14), true)]
    #[case(TimeDelta::minutes(15), false)]
    #[case(TimeDelta::hours(1), false)]
    fn access_tokens_expire_after_fifteen_minutes(
        service: JwtTokenService,
        #[case] elapsed: TimeDelta,
        #[case] accepted: bool,
    ) {
        let pair = service.issue_pair().expect("issue pair");
        let later = service_at(start() + elapsed);
        assert_eq!(later.verify_access(&pair.at).is_ok(), accepted);
    }

    #[rstest]
    #[case(TimeDelta::hours(7), true)]
    #[case(TimeDelta::hours(8), false)]
    fn refresh_tokens_expire_after_eight_hours(
        service: JwtTokenService,
        #[case] elapsed: TimeDelta,
        #[case] accepted: bool,
    ) {
        let pair = service.issue_pair().expect("issue pair");
        let later = service_at(start() + elapsed);
        assert_eq!(later.refresh(&pair.rt).is_ok(), accepted);
    }

    #[rstest]
    fn tampered_tokens_are_rejected(service: JwtTokenService) {
        let pair = service.issue_pair().expect("issue pair");
        let other = JwtTokenService::new(
            b"other-secret",
            Some(b"refresh-secret".as_slice()),
            Arc::new(FixtureClock(start())),
        );
        assert!(other.verify_access(&pair.at).is_err());
        assert!(service.verify_access("not.a.token").is_err());
    }

    #[test]
    fn missing_refresh_secret_blocks_login_and_refresh() {
        let service = JwtTokenService::new(b"access", None, Arc::new(FixtureClock(start())));
        assert_eq!(
            service.issue_pair(),
            Err(TokenError::missing_refresh_secret())
        );
        assert_eq!(
            service.refresh("anything").map(|_| ()),
            Err(TokenError::missing_refresh_secret())
        );
    }
}
