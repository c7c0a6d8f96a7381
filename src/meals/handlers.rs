use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::AppResult;
use crate::meals::dto::{MealInput, Pagination, PlanRequest, RecipeEntryInput};
use crate::meals::repo_types::Meal;
use crate::meals::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meals", get(read_meals).post(create_meal))
        .route("/meals/plan", post(plan_recipe))
        .route(
            "/meals/:id",
            get(read_meal).put(update_meal).delete(delete_meal),
        )
        .route("/meals/:id/recipes", post(add_recipe))
        .route("/meals/:id/recipes/:recipe_id", delete(remove_recipe))
}

#[instrument(skip(state, caller))]
async fn read_meals(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<Meal>>> {
    Ok(Json(
        services::read_user_meals(&state.meals, caller.id, p.limit, p.offset).await?,
    ))
}

#[instrument(skip(state, caller))]
async fn read_meal(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Meal>> {
    Ok(Json(
        services::read_meal_by_id(&state.meals, id, caller.id).await?,
    ))
}

#[instrument(skip(state, payload, caller))]
async fn create_meal(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<MealInput>,
) -> AppResult<(StatusCode, Json<Meal>)> {
    let meal = services::create_meal(&state.meals, payload.into_meal()?, caller.id).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state, payload, caller))]
async fn update_meal(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MealInput>,
) -> AppResult<Json<Meal>> {
    let meal = services::update_meal(&state.meals, id, payload.into_meal()?, caller.id).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, caller))]
async fn delete_meal(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_meal(&state.meals, id, caller.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload, caller))]
async fn add_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeEntryInput>,
) -> AppResult<Json<Meal>> {
    let meal =
        services::add_recipe_to_meal(&state.meals, id, payload.into_entry()?, caller.id).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, caller))]
async fn remove_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((id, recipe_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Meal>> {
    let meal =
        services::remove_recipe_from_meal(&state.meals, id, recipe_id, caller.id).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, payload, caller))]
async fn plan_recipe(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<PlanRequest>,
) -> AppResult<Json<Meal>> {
    let entry = payload.entry.into_entry()?;
    let meal = services::plan_recipe(&state.meals, &payload.date, entry, caller.id).await?;
    Ok(Json(meal))
}
