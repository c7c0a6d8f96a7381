use axum::{
    extract::{Multipart, Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/uploads", post(upload_file).delete(delete_file))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub file_url: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub detail: String,
}

/// Drop anything that could escape the uploads directory.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[instrument(skip(state, multipart, _caller))]
async fn upload_file(
    State(state): State<AppState>,
    _caller: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let uploads_dir = &state.config.uploads_dir;
    tokio::fs::create_dir_all(uploads_dir)
        .await
        .map_err(anyhow::Error::from)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        let Some(original) = field.file_name().map(sanitize_filename) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let filename = format!("{}_{}", Uuid::new_v4(), original);
        let path = format!("{uploads_dir}/{filename}");
        tokio::fs::write(&path, &data)
            .await
            .map_err(anyhow::Error::from)?;

        info!(%path, size = data.len(), "file uploaded");
        return Ok(Json(UploadResponse {
            file_url: format!("/{path}"),
        }));
    }

    Err(AppError::InvalidInput("missing file field".into()))
}

#[instrument(skip(state, _caller))]
async fn delete_file(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(params): Query<DeleteParams>,
) -> AppResult<Json<DeleteResponse>> {
    let uploads_dir = &state.config.uploads_dir;
    let file_path = params.file_url.trim_start_matches('/');

    // Only files inside the uploads directory may be removed.
    if !file_path.starts_with(&format!("{uploads_dir}/")) || file_path.contains("..") {
        return Err(AppError::InvalidInput("Invalid file URL".into()));
    }

    match tokio::fs::remove_file(file_path).await {
        Ok(()) => {
            info!(%file_path, "file deleted");
            Ok(Json(DeleteResponse {
                detail: "File deleted successfully".into(),
            }))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("File not found".into()))
        }
        Err(e) => Err(AppError::Internal(e.into())),
    }
}
