use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::meals::repo_types::{Meal, RecipeEntry};

/// Recipe entry as posted by clients; checked before it becomes a
/// [`RecipeEntry`].
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeEntryInput {
    pub recipe_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub servings: Option<i64>,
}

impl RecipeEntryInput {
    pub fn into_entry(self) -> AppResult<RecipeEntry> {
        let recipe_id = self
            .recipe_id
            .ok_or_else(|| AppError::InvalidInput("recipe_id is required".into()))?;
        let servings = self.servings.unwrap_or(1);
        if servings < 1 {
            return Err(AppError::Validation("Servings must be at least 1".into()));
        }
        Ok(RecipeEntry {
            recipe_id,
            title: self.title,
            servings,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MealInput {
    pub date: String,
    #[serde(default)]
    pub items: Vec<RecipeEntryInput>,
}

impl MealInput {
    pub fn into_meal(self) -> AppResult<Meal> {
        if self.date.trim().is_empty() {
            return Err(AppError::Validation("Meal date must not be empty".into()));
        }
        let items = self
            .items
            .into_iter()
            .map(RecipeEntryInput::into_entry)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Meal {
            id: None,
            date: self.date,
            items,
            user_id: None,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

/// Upsert-by-date payload for POST /meals/plan.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub date: String,
    #[serde(flatten)]
    pub entry: RecipeEntryInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_without_recipe_id_is_invalid_input() {
        let input: RecipeEntryInput =
            serde_json::from_value(serde_json::json!({ "title": "Pancakes" })).unwrap();
        let err = input.into_entry().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn entry_servings_default_to_one_and_must_be_positive() {
        let input: RecipeEntryInput =
            serde_json::from_value(serde_json::json!({ "recipe_id": Uuid::new_v4() })).unwrap();
        assert_eq!(input.into_entry().unwrap().servings, 1);

        let input: RecipeEntryInput = serde_json::from_value(
            serde_json::json!({ "recipe_id": Uuid::new_v4(), "servings": 0 }),
        )
        .unwrap();
        assert!(matches!(
            input.into_entry().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn meal_input_rejects_blank_date() {
        let input: MealInput =
            serde_json::from_value(serde_json::json!({ "date": "  ", "items": [] })).unwrap();
        assert!(matches!(
            input.into_meal().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn plan_request_flattens_entry_fields() {
        let req: PlanRequest = serde_json::from_value(serde_json::json!({
            "date": "2025-11-15",
            "recipe_id": Uuid::new_v4(),
            "servings": 2,
        }))
        .unwrap();
        assert_eq!(req.date, "2025-11-15");
        assert_eq!(req.entry.into_entry().unwrap().servings, 2);
    }
}
