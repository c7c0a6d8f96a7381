use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};
use crate::store::{DynRepo, Query};

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Register a new account. The uniqueness pre-check and the insert are
/// two store calls, so a narrow duplicate-username race window exists;
/// the store enforces no unique constraint.
pub async fn register(users: &DynRepo<User>, username: &str, password: &str) -> AppResult<User> {
    if !is_valid_username(username) {
        return Err(AppError::Validation("Invalid username".into()));
    }
    if password.len() < 8 {
        return Err(AppError::Validation("Password too short".into()));
    }

    let existing = users.read(Query::new().eq("username", username)).await?;
    if !existing.is_empty() {
        warn!(username = %username, "username already taken");
        return Err(AppError::Conflict(format!(
            "User {username} already exists"
        )));
    }

    let user = users
        .create(User {
            id: None,
            username: username.to_string(),
            password_hash: hash_password(password)?,
        })
        .await?;
    info!(user_id = ?user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Check credentials and return the account. Unknown username and wrong
/// password are indistinguishable to the caller.
pub async fn authenticate(
    users: &DynRepo<User>,
    username: &str,
    password: &str,
) -> AppResult<User> {
    let found = users.read(Query::new().eq("username", username)).await?;
    let Some(user) = found.into_iter().next() else {
        warn!(username = %username, "login with unknown username");
        return Err(AppError::InvalidCredentials);
    };
    if !verify_password(password, &user.password_hash)? {
        warn!(username = %username, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }
    Ok(user)
}

/// Delete an account by username.
pub async fn revoke(users: &DynRepo<User>, username: &str) -> AppResult<()> {
    let found = users.read(Query::new().eq("username", username)).await?;
    let Some(user) = found.into_iter().next() else {
        return Err(AppError::NotFound(format!("User not found: {username}")));
    };
    if let Some(id) = user.id {
        users.delete(id).await?;
    }
    info!(username = %username, "user revoked");
    Ok(())
}
