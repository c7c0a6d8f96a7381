use serde_json::json;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::groceries::repo_types::{GroceryItem, GroceryList};
use crate::store::{DynRepo, Query, SortDir};
use crate::units::normalize_unit_and_qty;

const GROCERY_NOT_FOUND_OR_DENIED: &str = "Grocery list not found or access denied";

async fn read_owned(
    groceries: &DynRepo<GroceryList>,
    grocery_id: Uuid,
    user_id: Uuid,
) -> AppResult<GroceryList> {
    let found = groceries
        .read(Query::new().id(grocery_id).eq("user_id", user_id.to_string()))
        .await?;
    found
        .into_iter()
        .next()
        .ok_or_else(|| AppError::AccessDenied(GROCERY_NOT_FOUND_OR_DENIED.into()))
}

/// Persist the items array, then re-read: the caller gets the store's
/// canonical post-write state, not the in-memory mutation.
async fn write_items_and_reload(
    groceries: &DynRepo<GroceryList>,
    grocery_id: Uuid,
    user_id: Uuid,
    items: &[GroceryItem],
) -> AppResult<GroceryList> {
    groceries
        .update(grocery_id, json!({ "items": items }))
        .await?;
    read_owned(groceries, grocery_id, user_id).await
}

/// Lists for one user, newest first.
pub async fn read_user_grocery_lists(
    groceries: &DynRepo<GroceryList>,
    user_id: Uuid,
) -> AppResult<Vec<GroceryList>> {
    Ok(groceries
        .read(
            Query::new()
                .eq("user_id", user_id.to_string())
                .sort("created_at", SortDir::Desc),
        )
        .await?)
}

pub async fn read_grocery_list_by_id(
    groceries: &DynRepo<GroceryList>,
    grocery_id: Uuid,
    user_id: Uuid,
) -> AppResult<GroceryList> {
    read_owned(groceries, grocery_id, user_id).await
}

/// Stamp owner and creation time, give every item an id, and rebuild
/// each item with its unit canonicalized. Name, entries and bought
/// status pass through untouched.
pub async fn create_grocery_list(
    groceries: &DynRepo<GroceryList>,
    mut list: GroceryList,
    user_id: Uuid,
) -> AppResult<GroceryList> {
    list.user_id = Some(user_id);
    list.created_at = Some(OffsetDateTime::now_utc());
    list.items = list
        .items
        .into_iter()
        .map(|item| {
            let (qty, unit) = normalize_unit_and_qty(item.qty, item.unit.as_deref());
            GroceryItem {
                id: Some(item.id.unwrap_or_else(Uuid::new_v4)),
                name: item.name,
                qty,
                unit: Some(unit),
                entries: item.entries,
                bought: item.bought,
            }
        })
        .collect();
    let saved = groceries.create(list).await?;
    info!(grocery_id = ?saved.id, %user_id, items = saved.items.len(), "grocery list created");
    Ok(saved)
}

/// Flip the bought flag of one item. A missing item id inside an owned
/// list is its own error kind, distinct from the ownership failure.
pub async fn update_item_status(
    groceries: &DynRepo<GroceryList>,
    grocery_id: Uuid,
    item_id: Uuid,
    bought: bool,
    user_id: Uuid,
) -> AppResult<GroceryList> {
    let mut list = read_owned(groceries, grocery_id, user_id).await?;
    let mut found = false;
    for item in &mut list.items {
        if item.id == Some(item_id) {
            item.bought = bought;
            found = true;
        }
    }
    if !found {
        return Err(AppError::ItemNotFound);
    }
    write_items_and_reload(groceries, grocery_id, user_id, &list.items).await
}

/// Set the bought flag on every item unconditionally.
pub async fn update_all_items_status(
    groceries: &DynRepo<GroceryList>,
    grocery_id: Uuid,
    bought: bool,
    user_id: Uuid,
) -> AppResult<GroceryList> {
    let mut list = read_owned(groceries, grocery_id, user_id).await?;
    for item in &mut list.items {
        item.bought = bought;
    }
    write_items_and_reload(groceries, grocery_id, user_id, &list.items).await
}

pub async fn delete_grocery_list(
    groceries: &DynRepo<GroceryList>,
    grocery_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    read_owned(groceries, grocery_id, user_id).await?;
    groceries.delete(grocery_id).await?;
    info!(%grocery_id, %user_id, "grocery list deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryRepository;
    use std::sync::Arc;

    fn repo() -> DynRepo<GroceryList> {
        Arc::new(MemoryRepository::new())
    }

    fn item(name: &str, qty: f64, unit: &str, entries: Vec<&str>) -> GroceryItem {
        GroceryItem {
            id: None,
            name: name.into(),
            qty: Some(qty),
            unit: Some(unit.into()),
            entries: entries.into_iter().map(String::from).collect(),
            bought: false,
        }
    }

    fn list(items: Vec<GroceryItem>) -> GroceryList {
        GroceryList {
            id: None,
            user_id: None,
            created_at: None,
            title: None,
            period_start: Some("2025-11-01".into()),
            period_end: Some("2025-11-30".into()),
            items,
        }
    }

    #[tokio::test]
    async fn create_normalizes_each_item_without_merging() {
        let groceries = repo();
        let owner = Uuid::new_v4();
        let saved = create_grocery_list(
            &groceries,
            list(vec![
                item("Carrot", 1.0, "kg", vec!["Recipe A ×2: 1 kg"]),
                item("Carrot", 500.0, "g", vec!["Recipe B ×1: 500 g"]),
            ]),
            owner,
        )
        .await
        .unwrap();

        assert_eq!(saved.user_id, Some(owner));
        assert!(saved.created_at.is_some());
        // both stay separate entries, each canonicalized to grams
        assert_eq!(saved.items.len(), 2);
        assert_eq!(saved.items[0].qty, Some(1000.0));
        assert_eq!(saved.items[0].unit.as_deref(), Some("g"));
        assert_eq!(saved.items[1].qty, Some(500.0));
        assert_eq!(saved.items[1].unit.as_deref(), Some("g"));
        assert_eq!(saved.items[0].entries, vec!["Recipe A ×2: 1 kg"]);
        assert!(saved.items.iter().all(|i| i.id.is_some()));
    }

    #[tokio::test]
    async fn create_keeps_client_supplied_item_ids() {
        let groceries = repo();
        let keep = Uuid::new_v4();
        let mut with_id = item("Eggs", 6.0, "pcs", vec![]);
        with_id.id = Some(keep);
        let saved = create_grocery_list(&groceries, list(vec![with_id]), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(saved.items[0].id, Some(keep));
        assert_eq!(saved.items[0].qty, Some(6.0));
        assert_eq!(saved.items[0].unit.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn update_item_status_flips_one_flag() {
        let groceries = repo();
        let owner = Uuid::new_v4();
        let saved = create_grocery_list(
            &groceries,
            list(vec![item("A", 1.0, "", vec![]), item("B", 2.0, "", vec![])]),
            owner,
        )
        .await
        .unwrap();
        let grocery_id = saved.id.unwrap();
        let target = saved.items[0].id.unwrap();

        let updated = update_item_status(&groceries, grocery_id, target, true, owner)
            .await
            .unwrap();
        assert!(updated.items[0].bought);
        assert!(!updated.items[1].bought);
    }

    #[tokio::test]
    async fn missing_item_is_item_not_found_and_no_write_occurs() {
        let groceries = repo();
        let owner = Uuid::new_v4();
        let saved = create_grocery_list(&groceries, list(vec![item("A", 1.0, "", vec![])]), owner)
            .await
            .unwrap();
        let grocery_id = saved.id.unwrap();

        let err = update_item_status(&groceries, grocery_id, Uuid::new_v4(), true, owner)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound));

        let fresh = read_grocery_list_by_id(&groceries, grocery_id, owner)
            .await
            .unwrap();
        assert!(!fresh.items[0].bought);
    }

    #[tokio::test]
    async fn update_all_sets_every_flag() {
        let groceries = repo();
        let owner = Uuid::new_v4();
        let saved = create_grocery_list(
            &groceries,
            list(vec![item("A", 1.0, "", vec![]), item("B", 2.0, "", vec![])]),
            owner,
        )
        .await
        .unwrap();
        let grocery_id = saved.id.unwrap();

        let updated = update_all_items_status(&groceries, grocery_id, true, owner)
            .await
            .unwrap();
        assert!(updated.items.iter().all(|i| i.bought));

        let cleared = update_all_items_status(&groceries, grocery_id, false, owner)
            .await
            .unwrap();
        assert!(cleared.items.iter().all(|i| !i.bought));
    }

    #[tokio::test]
    async fn ownership_is_required_and_conflated() {
        let groceries = repo();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let saved = create_grocery_list(&groceries, list(vec![]), owner).await.unwrap();
        let grocery_id = saved.id.unwrap();

        for err in [
            read_grocery_list_by_id(&groceries, grocery_id, stranger)
                .await
                .unwrap_err(),
            update_all_items_status(&groceries, grocery_id, true, stranger)
                .await
                .unwrap_err(),
            delete_grocery_list(&groceries, grocery_id, stranger)
                .await
                .unwrap_err(),
        ] {
            assert!(matches!(err, AppError::AccessDenied(_)));
            assert_eq!(err.to_string(), GROCERY_NOT_FOUND_OR_DENIED);
        }
    }

    #[tokio::test]
    async fn delete_removes_the_owned_list() {
        let groceries = repo();
        let owner = Uuid::new_v4();
        let saved = create_grocery_list(&groceries, list(vec![]), owner).await.unwrap();
        delete_grocery_list(&groceries, saved.id.unwrap(), owner)
            .await
            .unwrap();
        assert!(read_user_grocery_lists(&groceries, owner)
            .await
            .unwrap()
            .is_empty());
    }
}
