use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Caller role. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(alias = "user")]
    Standard,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Standard => "standard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "standard" | "user" => Ok(Role::Standard),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub hashed_password: String, // argon2 PHC string
    pub role: String,
}

impl User {
    /// Unknown stored roles fall back to `standard`.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}

/// Fields for a user insert; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub hashed_password: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_user_role_reads_as_standard() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::Standard);
        let r: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(r, Role::Standard);
    }

    #[test]
    fn unknown_stored_role_is_standard() {
        let u = User {
            id: 1,
            username: "a".into(),
            email: "a@b.c".into(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            hashed_password: String::new(),
            role: "superuser".into(),
        };
        assert_eq!(u.role(), Role::Standard);
    }
}
