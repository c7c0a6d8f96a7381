use serde::Deserialize;

use crate::groceries::repo_types::{GroceryItem, GroceryList};

/// Client payload for creating a grocery list; owner and creation time
/// are stamped server-side.
#[derive(Debug, Deserialize)]
pub struct GroceryListInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub period_start: Option<String>,
    #[serde(default)]
    pub period_end: Option<String>,
    #[serde(default)]
    pub items: Vec<GroceryItem>,
}

impl From<GroceryListInput> for GroceryList {
    fn from(input: GroceryListInput) -> Self {
        GroceryList {
            id: None,
            user_id: None,
            created_at: None,
            title: input.title,
            period_start: input.period_start,
            period_end: input.period_end,
            items: input.items,
        }
    }
}

/// Bought flag carried as a query parameter on PATCH routes.
#[derive(Debug, Deserialize)]
pub struct BoughtParam {
    pub bought: bool,
}
