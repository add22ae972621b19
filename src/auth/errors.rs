use tracing::warn;

use crate::{db::StoreError, error::AppError};

/// Failures of token handling, login and re-authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token is missing subject or id")]
    MalformedToken,
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken(err) => {
                warn!(error = %err, "token rejected");
                AppError::Unauthenticated("Could not validate user")
            }
            AuthError::MalformedToken => AppError::Unauthenticated("Could not validate user"),
            // Login does not reveal which half of the credentials was wrong.
            AuthError::NotFound | AuthError::InvalidCredentials => {
                AppError::InvalidCredentials("Could not validate user")
            }
            AuthError::Hashing(msg) => AppError::Internal(msg),
            AuthError::Store(err) => err.into(),
        }
    }
}
