use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for registration and account revocation.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
    pub username: String,
}

/// Login form posted to /token.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Bearer token returned after login.
#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Public part of a user returned to clients; never carries the hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Option<Uuid>,
    pub username: String,
}

impl From<crate::auth::repo_types::User> for PublicUser {
    fn from(user: crate::auth::repo_types::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}
