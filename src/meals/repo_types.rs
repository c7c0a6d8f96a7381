use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

fn default_servings() -> i64 {
    1
}

/// One planned recipe within a meal, with a title snapshot so the plan
/// stays readable if the recipe is renamed or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeEntry {
    pub recipe_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: i64,
}

/// Meal document: a calendar date with an ordered list of recipe
/// entries. The (date, user_id) pair acts as a natural key for plan
/// operations but is not unique at the store level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub date: String, // ISO calendar date
    #[serde(default)]
    pub items: Vec<RecipeEntry>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl Document for Meal {
    const COLLECTION: &'static str = "meals";

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
