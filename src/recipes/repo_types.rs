use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::Document;

/// Single ingredient line. Quantity and unit are stored in canonical
/// form (grams / milliliters / unitless counts) after normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A user review attached to a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub rating: u8,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Recipe document. Child recipes nest to unbounded depth; reviews are
/// appended through their own endpoint, never via create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub prep_time: Option<i64>, // minutes
    #[serde(default)]
    pub cook_time: Option<i64>, // minutes
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub children: Vec<Recipe>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Document for Recipe {
    const COLLECTION: &'static str = "recipes";

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
