use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::AppResult;
use crate::groceries::dto::{BoughtParam, GroceryListInput};
use crate::groceries::repo_types::GroceryList;
use crate::groceries::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groceries", get(read_groceries).post(create_grocery))
        .route(
            "/groceries/:id",
            get(read_grocery).delete(delete_grocery),
        )
        .route("/groceries/:id/items", patch(update_all_items_status))
        .route("/groceries/:id/items/:item_id", patch(update_item_status))
}

#[instrument(skip(state, caller))]
async fn read_groceries(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<GroceryList>>> {
    Ok(Json(
        services::read_user_grocery_lists(&state.groceries, caller.id).await?,
    ))
}

#[instrument(skip(state, caller))]
async fn read_grocery(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<GroceryList>> {
    Ok(Json(
        services::read_grocery_list_by_id(&state.groceries, id, caller.id).await?,
    ))
}

#[instrument(skip(state, payload, caller))]
async fn create_grocery(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<GroceryListInput>,
) -> AppResult<(StatusCode, Json<GroceryList>)> {
    let saved =
        services::create_grocery_list(&state.groceries, payload.into(), caller.id).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, caller))]
async fn update_item_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<BoughtParam>,
) -> AppResult<Json<GroceryList>> {
    let updated =
        services::update_item_status(&state.groceries, id, item_id, params.bought, caller.id)
            .await?;
    Ok(Json(updated))
}

#[instrument(skip(state, caller))]
async fn update_all_items_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<BoughtParam>,
) -> AppResult<Json<GroceryList>> {
    let updated =
        services::update_all_items_status(&state.groceries, id, params.bought, caller.id).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, caller))]
async fn delete_grocery(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_grocery_list(&state.groceries, id, caller.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
