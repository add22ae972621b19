use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::{claims::Claims, errors::AuthError};
use crate::{
    config::JwtConfig,
    state::AppState,
    users::repo_types::{Role, User},
};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing and verification keys plus the access-token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }

    pub fn issue(
        &self,
        username: &str,
        user_id: i64,
        role: Role,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let exp = OffsetDateTime::now_utc() + ttl;
        let claims = Claims {
            sub: Some(username.to_string()),
            id: Some(user_id),
            role: Some(role.as_str().to_string()),
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        debug!(user_id, %role, "jwt signed");
        Ok(token)
    }

    pub fn issue_access(&self, user: &User) -> Result<String, AuthError> {
        self.issue(&user.username, user.id, user.role(), self.ttl)
    }

    /// Checks signature, structure and `exp` with no leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = ?data.claims.id, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_minutes: 20,
        })
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let keys = keys("dev-secret");
        let token = keys
            .issue("testuser", 1, Role::Admin, Duration::days(1))
            .expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub.as_deref(), Some("testuser"));
        assert_eq!(claims.id, Some(1));
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn expiry_honours_ttl() {
        let keys = keys("dev-secret");
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let token = keys.issue("u", 2, Role::Standard, keys.ttl).unwrap();
        let claims = keys.verify(&token).unwrap();
        let delta = claims.exp - before;
        assert!((20 * 60..=20 * 60 + 5).contains(&delta), "delta was {delta}");
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys("dev-secret");
        let token = keys
            .issue("u", 2, Role::Standard, Duration::seconds(-5))
            .unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = keys("one")
            .issue("u", 2, Role::Standard, Duration::minutes(5))
            .unwrap();
        assert!(keys("two").verify(&token).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let keys = keys("dev-secret");
        let token = keys.issue("u", 2, Role::Standard, Duration::minutes(5)).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push('A');
        assert!(keys.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(keys("dev-secret").verify("not.a.jwt").is_err());
    }
}
