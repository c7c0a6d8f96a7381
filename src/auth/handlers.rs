use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{delete, get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{LoginForm, PublicUser, RegisterRequest, RevokeRequest, Token};
use crate::auth::jwt::{AuthUser, JwtKeys};
use crate::auth::services;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(login_for_access_token))
        .route("/auth/register", post(register))
        .route("/auth/revoke", delete(revoke))
        .route("/me", get(get_me))
}

#[instrument(skip(state, form))]
async fn login_for_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<Token>> {
    let user = services::authenticate(&state.users, &form.username, &form.password).await?;
    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("stored user missing id")))?;
    let access_token = JwtKeys::from_ref(&state).sign(user_id, &user.username)?;
    Ok(Json(Token {
        access_token,
        token_type: "bearer".into(),
    }))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    payload.username = payload.username.trim().to_string();
    let user = services::register(&state.users, &payload.username, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, caller))]
async fn revoke(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<RevokeRequest>,
) -> AppResult<StatusCode> {
    // Self-service only: a user may revoke no account but their own.
    if caller.username != payload.username {
        return Err(AppError::AccessDenied("Operation not permitted".into()));
    }
    services::revoke(&state.users, &payload.username).await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(caller))]
async fn get_me(caller: AuthUser) -> Json<PublicUser> {
    Json(PublicUser {
        id: Some(caller.id),
        username: caller.username,
    })
}
