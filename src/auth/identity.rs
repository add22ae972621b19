use serde::Serialize;
use tracing::{debug, warn};

use super::{errors::AuthError, jwt::JwtKeys, password::verify_password};
use crate::users::{
    repo::UserRepo,
    repo_types::{Role, User},
};

/// The authenticated caller, resolved once per request from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    pub id: i64,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Looks up `username` and checks `password` against the stored hash.
pub async fn authenticate(
    users: &dyn UserRepo,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = users
        .find_by_username(username)
        .await?
        .ok_or_else(|| {
            warn!(%username, "login unknown username");
            AuthError::NotFound
        })?;

    if !verify_password(password, &user.hashed_password)? {
        warn!(%username, user_id = user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user)
}

/// Verifies `token` and projects its claims onto an [`Identity`].
pub fn resolve(keys: &JwtKeys, token: &str) -> Result<Identity, AuthError> {
    let claims = keys.verify(token)?;
    let (Some(username), Some(id)) = (claims.sub, claims.id) else {
        warn!("token missing sub or id");
        return Err(AuthError::MalformedToken);
    };
    let role = claims
        .role
        .as_deref()
        .and_then(|r| r.parse().ok())
        .unwrap_or_default();
    debug!(user_id = id, %role, "identity resolved");
    Ok(Identity { username, id, role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{claims::Claims, password::hash_password},
        config::JwtConfig,
        memory::MemoryStore,
        users::repo_types::NewUser,
    };
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    const SECRET: &str = "resolver-secret";

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: SECRET.into(),
            ttl_minutes: 20,
        })
    }

    fn raw_token(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn in_five_minutes() -> i64 {
        (OffsetDateTime::now_utc() + Duration::minutes(5)).unix_timestamp()
    }

    #[test]
    fn resolves_valid_token() {
        let keys = keys();
        let token = keys
            .issue("testuser", 1, Role::Admin, Duration::minutes(5))
            .unwrap();
        let identity = resolve(&keys, &token).unwrap();
        assert_eq!(
            identity,
            Identity {
                username: "testuser".into(),
                id: 1,
                role: Role::Admin
            }
        );
        assert!(identity.is_admin());
    }

    #[test]
    fn missing_subject_or_id_is_malformed() {
        let keys = keys();
        let no_sub = raw_token(&Claims {
            sub: None,
            id: Some(1),
            role: Some("user".into()),
            exp: in_five_minutes(),
        });
        let no_id = raw_token(&Claims {
            sub: Some("testuser".into()),
            id: None,
            role: None,
            exp: in_five_minutes(),
        });
        assert!(matches!(resolve(&keys, &no_sub), Err(AuthError::MalformedToken)));
        assert!(matches!(resolve(&keys, &no_id), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn expired_token_never_resolves() {
        let keys = keys();
        let token = raw_token(&Claims {
            sub: Some("testuser".into()),
            id: Some(1),
            role: Some("admin".into()),
            exp: (OffsetDateTime::now_utc() - Duration::minutes(1)).unix_timestamp(),
        });
        assert!(matches!(resolve(&keys, &token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn unknown_role_claim_is_standard() {
        let keys = keys();
        let token = raw_token(&Claims {
            sub: Some("x".into()),
            id: Some(3),
            role: Some("root".into()),
            exp: in_five_minutes(),
        });
        assert_eq!(resolve(&keys, &token).unwrap().role, Role::Standard);
    }

    async fn store_with_user() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create(&NewUser {
                username: "admin".into(),
                email: "admin@email.com".into(),
                first_name: "admin".into(),
                last_name: "admin".into(),
                phone_number: Some("(111)-111-1111".into()),
                hashed_password: hash_password("test1234!").unwrap(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn authenticate_accepts_correct_password() {
        let store = store_with_user().await;
        let user = authenticate(&store, "admin", "test1234!").await.unwrap();
        assert_eq!(user.username, "admin");
    }

    #[tokio::test]
    async fn authenticate_unknown_user_is_not_found() {
        let store = store_with_user().await;
        let err = authenticate(&store, "WrongUserName", "password").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn authenticate_wrong_password_is_invalid_credentials() {
        let store = store_with_user().await;
        let err = authenticate(&store, "admin", "wrong_pass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
