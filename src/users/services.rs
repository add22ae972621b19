use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{RegisterRequest, UserProfile},
    repo::UserRepo,
    repo_types::{NewUser, Role, User},
};
use crate::{
    auth::{
        password::{hash_password, verify_password},
        Identity,
    },
    config::AdminSeed,
    error::{AppError, FieldError},
};

pub const PASSWORD_MIN: usize = 6;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Self-service sign-up. Always creates a standard account.
pub async fn register(users: &dyn UserRepo, req: RegisterRequest) -> Result<User, AppError> {
    create_account(users, req, Role::Standard).await
}

/// Creates the configured admin unless the username is already taken. An
/// existing account of that name is left as it is, whatever its role.
/// Returns whether a row was created.
pub async fn ensure_admin(users: &dyn UserRepo, seed: &AdminSeed) -> Result<bool, AppError> {
    if let Some(existing) = users.find_by_username(&seed.username).await? {
        if existing.role() == Role::Admin {
            info!(username = %existing.username, "admin user already exists");
        } else {
            warn!(username = %existing.username, "admin username taken by a non-admin account");
        }
        return Ok(false);
    }

    let req = RegisterRequest {
        username: seed.username.clone(),
        email: seed.email.clone(),
        first_name: String::new(),
        last_name: String::new(),
        password: seed.password.clone(),
        phone_number: None,
    };
    create_account(users, req, Role::Admin).await?;
    Ok(true)
}

async fn create_account(
    users: &dyn UserRepo,
    req: RegisterRequest,
    role: Role,
) -> Result<User, AppError> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();

    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push(FieldError::new("username", "must not be empty"));
    }
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "is not a valid address"));
    }
    if req.password.chars().count() < PASSWORD_MIN {
        errors.push(FieldError::new(
            "password",
            format!("must be at least {PASSWORD_MIN} characters"),
        ));
    }
    if !errors.is_empty() {
        warn!(%username, "registration rejected");
        return Err(AppError::Validation(errors));
    }

    let new = NewUser {
        username,
        email,
        first_name: req.first_name,
        last_name: req.last_name,
        phone_number: req.phone_number,
        hashed_password: hash_password(&req.password)?,
        role,
    };
    let user = users.create(&new).await.map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::Conflict("Username or email already registered".into()),
        other => other,
    })?;

    info!(user_id = user.id, username = %user.username, role = %user.role, "user registered");
    Ok(user)
}

/// Loads the caller's row. A valid token for a vanished user is an auth failure.
async fn load_caller(users: &dyn UserRepo, identity: &Identity) -> Result<User, AppError> {
    users.find_by_id(identity.id).await?.ok_or_else(|| {
        warn!(user_id = identity.id, "token for missing user");
        AppError::Unauthenticated("User not found")
    })
}

pub async fn get_profile(identity: &Identity, users: &dyn UserRepo) -> Result<UserProfile, AppError> {
    Ok(load_caller(users, identity).await?.into())
}

pub async fn change_password(
    identity: &Identity,
    users: &dyn UserRepo,
    old_plain: &str,
    new_plain: &str,
) -> Result<(), AppError> {
    if new_plain.chars().count() < PASSWORD_MIN {
        return Err(AppError::Validation(vec![FieldError::new(
            "new_password",
            format!("must be at least {PASSWORD_MIN} characters"),
        )]));
    }

    let user = load_caller(users, identity).await?;
    if !verify_password(old_plain, &user.hashed_password)? {
        warn!(user_id = user.id, "password change with wrong current password");
        return Err(AppError::InvalidCredentials("Error on password change"));
    }

    let hashed = hash_password(new_plain)?;
    if !users.update_password_hash(user.id, &hashed).await? {
        return Err(AppError::Unauthenticated("User not found"));
    }
    info!(user_id = user.id, "password changed");
    Ok(())
}

/// Overwrites the caller's phone number as given; no format checks.
pub async fn change_phone_number(
    identity: &Identity,
    users: &dyn UserRepo,
    phone_number: &str,
) -> Result<(), AppError> {
    if !users.update_phone_number(identity.id, phone_number).await? {
        warn!(user_id = identity.id, "token for missing user");
        return Err(AppError::Unauthenticated("User not found"));
    }
    info!(user_id = identity.id, "phone number changed");
    Ok(())
}
