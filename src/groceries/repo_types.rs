use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::Document;

/// One line on a grocery list. `entries` records the free-text source
/// contributions (which recipe asked for how much); items with the
/// same name are NOT merged, each keeps its own provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryItem {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub qty: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default)]
    pub bought: bool,
}

/// Grocery list document. Every item carries a non-null id after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub period_start: Option<String>,
    #[serde(default)]
    pub period_end: Option<String>,
    #[serde(default)]
    pub items: Vec<GroceryItem>,
}

impl Document for GroceryList {
    const COLLECTION: &'static str = "grocery_lists";

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
