use serde::{Deserialize, Serialize};

/// JWT payload used for authentication.
///
/// `sub` and `id` are optional on decode so that a token signed with our key
/// but missing either field is reported as malformed rather than as a
/// generic decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>, // username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>, // users.id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64, // expires at (unix timestamp)
}
