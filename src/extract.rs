use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection},
        path::ErrorKind,
        FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    Form, Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::error::{AppError, FieldError};

/// `Json` whose rejections render as `{"detail": [...]}` like every other error.
pub struct ApiJson<T>(pub T);

/// `Form` with the same rejection shape as [`ApiJson`].
pub struct ApiForm<T>(pub T);

/// `Path` with the same rejection shape as [`ApiJson`].
pub struct ApiPath<T>(pub T);

/// The `:id` segment of the todo routes. Ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoId(pub i64);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for ApiForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[derive(Deserialize)]
struct IdParam {
    id: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ApiPath(IdParam { id }) = ApiPath::<IdParam>::from_request_parts(parts, state).await?;
        if id < 1 {
            debug!(id, "non-positive todo id");
            return Err(AppError::Validation(vec![FieldError::new(
                "id",
                "must be greater than 0",
            )]));
        }
        Ok(Self(id))
    }
}

/// Turns a serde message such as ``missing field `priority` at line 1`` or
/// `priority: invalid type: string "x", expected i32` into a field error.
/// Messages that name no field are reported against `body`.
fn field_error_from_serde(message: &str) -> FieldError {
    if let Some(rest) = message.strip_prefix("missing field `") {
        if let Some((name, _)) = rest.split_once('`') {
            return FieldError::new(name, "field required");
        }
    }
    if let Some((path, reason)) = message.split_once(": ") {
        if !path.is_empty() && !path.contains(char::is_whitespace) {
            return FieldError::new(path, reason);
        }
    }
    FieldError::new("body", message)
}

/// Drops axum's `"Failed to ...: "` lead-in from a rejection body.
fn serde_part(body_text: &str) -> &str {
    body_text
        .split_once(": ")
        .map_or(body_text, |(_, rest)| rest)
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        debug!(error = %text, "rejected JSON body");
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                AppError::Validation(vec![field_error_from_serde(serde_part(&text))])
            }
            other => AppError::Rejected {
                status: other.status(),
                detail: text,
            },
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        let text = rejection.body_text();
        debug!(error = %text, "rejected form body");
        match rejection {
            FormRejection::FailedToDeserializeForm(_)
            | FormRejection::FailedToDeserializeFormBody(_) => {
                AppError::Validation(vec![field_error_from_serde(serde_part(&text))])
            }
            other => AppError::Rejected {
                status: other.status(),
                detail: text,
            },
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                let field = match err.kind() {
                    ErrorKind::ParseErrorAtKey { key, .. }
                    | ErrorKind::InvalidUtf8InPathParam { key } => key.clone(),
                    _ => "path".to_string(),
                };
                let message = err.kind().to_string();
                debug!(%field, error = %message, "rejected path parameter");
                AppError::Validation(vec![FieldError::new(field, message)])
            }
            // Only reachable when a handler is mounted on a route without params.
            other => AppError::Internal(other.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_field() {
        let text = "Failed to deserialize the JSON body into the target type: \
                    missing field `priority` at line 1 column 15";
        let err = field_error_from_serde(serde_part(text));
        assert_eq!(err.field, "priority");
        assert_eq!(err.message, "field required");
    }

    #[test]
    fn wrong_type_uses_the_serde_path() {
        let text = "Failed to deserialize the JSON body into the target type: \
                    priority: invalid type: string \"high\", expected i32 at line 1 column 30";
        let err = field_error_from_serde(serde_part(text));
        assert_eq!(err.field, "priority");
        assert!(err.message.starts_with("invalid type"));
    }

    #[test]
    fn syntax_errors_are_reported_against_body() {
        let text = "Failed to parse the request body as JSON: expected value at line 1 column 1";
        let err = field_error_from_serde(serde_part(text));
        assert_eq!(err.field, "body");
        assert_eq!(err.message, "expected value at line 1 column 1");
    }

    #[test]
    fn form_missing_field() {
        let text = "Failed to deserialize form body: missing field `password`";
        assert_eq!(field_error_from_serde(serde_part(text)).field, "password");
    }
}
