use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::meals::repo_types::{Meal, RecipeEntry};
use crate::store::{DynRepo, Query, SortDir};

const MEAL_NOT_FOUND_OR_DENIED: &str = "Meal not found or access denied";

/// Read filtered by id AND owner in one call: "absent" and "not owned"
/// are deliberately indistinguishable.
async fn read_owned(meals: &DynRepo<Meal>, meal_id: Uuid, user_id: Uuid) -> AppResult<Meal> {
    let found = meals
        .read(Query::new().id(meal_id).eq("user_id", user_id.to_string()))
        .await?;
    found
        .into_iter()
        .next()
        .ok_or_else(|| AppError::AccessDenied(MEAL_NOT_FOUND_OR_DENIED.into()))
}

/// Meals sorted by date, paginated.
pub async fn read_user_meals(
    meals: &DynRepo<Meal>,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Meal>> {
    Ok(meals
        .read(
            Query::new()
                .eq("user_id", user_id.to_string())
                .sort("date", SortDir::Asc)
                .skip(offset)
                .limit(limit),
        )
        .await?)
}

pub async fn read_meal_by_id(
    meals: &DynRepo<Meal>,
    meal_id: Uuid,
    user_id: Uuid,
) -> AppResult<Meal> {
    read_owned(meals, meal_id, user_id).await
}

pub async fn create_meal(meals: &DynRepo<Meal>, mut meal: Meal, user_id: Uuid) -> AppResult<Meal> {
    meal.user_id = Some(user_id);
    let saved = meals.create(meal).await?;
    info!(meal_id = ?saved.id, %user_id, date = %saved.date, "meal created");
    Ok(saved)
}

pub async fn update_meal(
    meals: &DynRepo<Meal>,
    meal_id: Uuid,
    meal: Meal,
    user_id: Uuid,
) -> AppResult<Meal> {
    read_owned(meals, meal_id, user_id).await?;
    meals
        .update(meal_id, json!({ "date": meal.date, "items": meal.items }))
        .await?;
    read_owned(meals, meal_id, user_id).await
}

pub async fn delete_meal(meals: &DynRepo<Meal>, meal_id: Uuid, user_id: Uuid) -> AppResult<()> {
    read_owned(meals, meal_id, user_id).await?;
    meals.delete(meal_id).await?;
    info!(%meal_id, %user_id, "meal deleted");
    Ok(())
}

/// Append one recipe entry to an owned meal.
pub async fn add_recipe_to_meal(
    meals: &DynRepo<Meal>,
    meal_id: Uuid,
    entry: RecipeEntry,
    user_id: Uuid,
) -> AppResult<Meal> {
    let mut meal = read_owned(meals, meal_id, user_id).await?;
    meal.items.push(entry);
    meals.update(meal_id, json!({ "items": meal.items })).await?;
    Ok(meal)
}

/// Drop every entry whose recipe_id matches.
pub async fn remove_recipe_from_meal(
    meals: &DynRepo<Meal>,
    meal_id: Uuid,
    recipe_id: Uuid,
    user_id: Uuid,
) -> AppResult<Meal> {
    let mut meal = read_owned(meals, meal_id, user_id).await?;
    meal.items.retain(|entry| entry.recipe_id != recipe_id);
    meals.update(meal_id, json!({ "items": meal.items })).await?;
    Ok(meal)
}

/// Upsert by the (date, owner) natural key: append to the existing meal
/// for that date, or create one. If duplicates exist for the pair (the
/// store does not prevent it) the first result wins.
pub async fn plan_recipe(
    meals: &DynRepo<Meal>,
    date: &str,
    entry: RecipeEntry,
    user_id: Uuid,
) -> AppResult<Meal> {
    if date.trim().is_empty() {
        return Err(AppError::Validation("Meal date must not be empty".into()));
    }
    let existing = meals
        .read(
            Query::new()
                .eq("date", date)
                .eq("user_id", user_id.to_string()),
        )
        .await?;
    if let Some(mut meal) = existing.into_iter().next() {
        meal.items.push(entry);
        let meal_id = meal
            .id
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("stored meal missing id")))?;
        meals.update(meal_id, json!({ "items": meal.items })).await?;
        return Ok(meal);
    }
    let saved = meals
        .create(Meal {
            id: None,
            date: date.to_string(),
            items: vec![entry],
            user_id: Some(user_id),
        })
        .await?;
    info!(meal_id = ?saved.id, %user_id, %date, "meal planned");
    Ok(saved)
}
