use serde::{Deserialize, Serialize};

use super::repo_types::{Role, User};

/// Request body for user registration. Accounts are always created with the
/// standard role; a `role` key in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Request body for `PUT /user/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
}

/// User as returned to its owner; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        let role = u.role();
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role,
            phone_number: u.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serialization_omits_hash() {
        let user = User {
            id: 1,
            username: "admin".into(),
            email: "admin@email.com".into(),
            first_name: "admin".into(),
            last_name: "admin".into(),
            phone_number: Some("(111)-111-1111".into()),
            hashed_password: "$argon2id$secret".into(),
            role: "admin".into(),
        };
        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert_eq!(json["username"], "admin");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["phone_number"], "(111)-111-1111");
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn register_body_with_role_still_parses() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"u","email":"u@x.io","password":"secret1","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(req.username, "u");
        assert!(req.phone_number.is_none());
    }
}
