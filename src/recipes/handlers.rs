use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::{AppError, AppResult};
use crate::recipes::dto::{RecipeInput, RecipeSearch, ReviewInput};
use crate::recipes::repo_types::{Recipe, Review};
use crate::recipes::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(read_recipes).post(create_recipe))
        .route("/recipes/ingredient-names", get(ingredient_names))
        .route(
            "/recipes/:id",
            get(read_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/:id/reviews", post(add_review))
}

// Recipe reads are "public": any authenticated user, no ownership filter.
#[instrument(skip(state, _caller))]
async fn read_recipes(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(params): Query<RecipeSearch>,
) -> AppResult<Json<Vec<Recipe>>> {
    let recipes = services::read_recipes(&state.recipes, params.search.as_deref()).await?;
    Ok(Json(recipes))
}

#[instrument(skip(state, _caller))]
async fn read_recipe(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Recipe>> {
    Ok(Json(services::read_recipe_by_id(&state.recipes, id).await?))
}

#[instrument(skip(state, payload, caller))]
async fn create_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<RecipeInput>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let saved = services::create_recipe(&state.recipes, payload.into(), caller.id).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, payload, caller))]
async fn update_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeInput>,
) -> AppResult<Json<Recipe>> {
    let updated = services::update_recipe(&state.recipes, id, payload.into(), caller.id).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, caller))]
async fn delete_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_recipe(&state.recipes, id, caller.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, _caller))]
async fn ingredient_names(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(services::ingredient_names(&state.recipes).await?))
}

#[instrument(skip(state, payload, caller))]
async fn add_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewInput>,
) -> AppResult<(StatusCode, Json<Review>)> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("Rating must be between 1 and 5".into()));
    }
    let review = services::add_review(
        &state.recipes,
        id,
        caller.id,
        &caller.username,
        payload.rating,
        payload.comment,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(review)))
}
