use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure kinds surfaced by the use-case layer.
///
/// Every failure is raised explicitly and propagates unchanged to the
/// HTTP boundary; nothing is retried or swallowed below it.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before any persistence attempt (empty title, bad rating, ...).
    #[error("{0}")]
    Validation(String),

    /// Malformed payload for an otherwise valid route.
    #[error("{0}")]
    InvalidInput(String),

    /// Entity absent or owned by someone else. For meals and grocery
    /// lists the two cases are deliberately indistinguishable.
    #[error("{0}")]
    AccessDenied(String),

    /// Public read missed (recipes are readable by anyone).
    #[error("{0}")]
    NotFound(String),

    /// A grocery item id that does not exist inside an owned list.
    #[error("Item not found in grocery list")]
    ItemNotFound,

    /// Duplicate username at registration.
    #[error("{0}")]
    Conflict(String),

    /// Wrong username or password at login.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Opaque store or crypto failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::ItemNotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response();
            }
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
