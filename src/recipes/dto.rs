use serde::Deserialize;

use crate::recipes::repo_types::{Ingredient, Recipe};

/// Client payload for creating or replacing a recipe. Server-managed
/// fields (id, author, reviews) are deliberately absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub prep_time: Option<i64>,
    #[serde(default)]
    pub cook_time: Option<i64>,
    #[serde(default)]
    pub children: Vec<RecipeInput>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<RecipeInput> for Recipe {
    fn from(input: RecipeInput) -> Self {
        Recipe {
            id: None,
            title: input.title,
            description: input.description,
            ingredients: input.ingredients,
            prep_time: input.prep_time,
            cook_time: input.cook_time,
            author_id: None,
            children: input.children.into_iter().map(Recipe::from).collect(),
            tags: input.tags,
            reviews: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct RecipeSearch {
    pub search: Option<String>,
}
