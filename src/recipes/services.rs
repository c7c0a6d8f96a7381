use serde_json::json;
use std::collections::BTreeSet;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::recipes::repo_types::{Recipe, Review};
use crate::store::{DynRepo, Query};
use crate::units::normalize_unit_and_qty;

/// Canonicalize every ingredient quantity, recursing into child recipes.
fn normalize_ingredients(recipe: &mut Recipe) {
    for ingredient in &mut recipe.ingredients {
        let (qty, unit) = normalize_unit_and_qty(ingredient.quantity, ingredient.unit.as_deref());
        ingredient.quantity = qty;
        ingredient.unit = Some(unit);
    }
    for child in &mut recipe.children {
        normalize_ingredients(child);
    }
}

/// Recipes are public reads; `search` is an optional case-insensitive
/// title substring match.
pub async fn read_recipes(
    recipes: &DynRepo<Recipe>,
    search: Option<&str>,
) -> AppResult<Vec<Recipe>> {
    let query = match search {
        Some(needle) if !needle.is_empty() => Query::new().contains("title", needle),
        _ => Query::new(),
    };
    Ok(recipes.read(query).await?)
}

pub async fn read_recipe_by_id(recipes: &DynRepo<Recipe>, recipe_id: Uuid) -> AppResult<Recipe> {
    let found = recipes.read(Query::new().id(recipe_id)).await?;
    found
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}

pub async fn create_recipe(
    recipes: &DynRepo<Recipe>,
    mut recipe: Recipe,
    author_id: Uuid,
) -> AppResult<Recipe> {
    if recipe.title.trim().is_empty() {
        return Err(AppError::Validation("Recipe title must not be empty".into()));
    }
    recipe.author_id = Some(author_id);
    normalize_ingredients(&mut recipe);
    let saved = recipes.create(recipe).await?;
    info!(recipe_id = ?saved.id, author_id = %author_id, "recipe created");
    Ok(saved)
}

/// Fetch by id alone, then compare authors: "not found" and "not the
/// author" are reported distinctly since recipe reads are public.
async fn read_owned(recipes: &DynRepo<Recipe>, recipe_id: Uuid, user_id: Uuid, action: &str) -> AppResult<Recipe> {
    let found = recipes.read(Query::new().id(recipe_id)).await?;
    let Some(recipe) = found.into_iter().next() else {
        return Err(AppError::AccessDenied("Recipe not found".into()));
    };
    if recipe.author_id != Some(user_id) {
        return Err(AppError::AccessDenied(format!(
            "Only the author can {action} this recipe"
        )));
    }
    Ok(recipe)
}

pub async fn update_recipe(
    recipes: &DynRepo<Recipe>,
    recipe_id: Uuid,
    mut recipe: Recipe,
    user_id: Uuid,
) -> AppResult<Recipe> {
    read_owned(recipes, recipe_id, user_id, "update").await?;
    if recipe.title.trim().is_empty() {
        return Err(AppError::Validation("Recipe title must not be empty".into()));
    }
    normalize_ingredients(&mut recipe);
    recipes
        .update(
            recipe_id,
            json!({
                "title": recipe.title,
                "description": recipe.description,
                "ingredients": recipe.ingredients,
                "prep_time": recipe.prep_time,
                "cook_time": recipe.cook_time,
                "children": recipe.children,
                "tags": recipe.tags,
            }),
        )
        .await?;
    read_recipe_by_id(recipes, recipe_id).await
}

pub async fn delete_recipe(
    recipes: &DynRepo<Recipe>,
    recipe_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    read_owned(recipes, recipe_id, user_id, "delete").await?;
    recipes.delete(recipe_id).await?;
    info!(%recipe_id, %user_id, "recipe deleted");
    Ok(())
}

/// Deduplicated, sorted ingredient names across all recipes.
pub async fn ingredient_names(recipes: &DynRepo<Recipe>) -> AppResult<Vec<String>> {
    let all = recipes.read(Query::new()).await?;
    let names: BTreeSet<String> = all
        .into_iter()
        .flat_map(|recipe| recipe.ingredients)
        .map(|ingredient| ingredient.name)
        .filter(|name| !name.is_empty())
        .collect();
    Ok(names.into_iter().collect())
}

/// Append a review to a recipe. No ownership check: any authenticated
/// user may review. The rating is validated at the HTTP boundary.
pub async fn add_review(
    recipes: &DynRepo<Recipe>,
    recipe_id: Uuid,
    user_id: Uuid,
    username: &str,
    rating: u8,
    comment: String,
) -> AppResult<Review> {
    let mut recipe = read_recipe_by_id(recipes, recipe_id).await?;
    let review = Review {
        id: Uuid::new_v4(),
        user_id,
        username: username.to_string(),
        rating,
        comment,
        created_at: OffsetDateTime::now_utc(),
    };
    recipe.reviews.push(review.clone());
    recipes
        .update(recipe_id, json!({ "reviews": recipe.reviews }))
        .await?;
    info!(%recipe_id, %user_id, rating, "review added");
    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::repo_types::Ingredient;
    use crate::store::memory::MemoryRepository;
    use std::sync::Arc;

    fn repo() -> DynRepo<Recipe> {
        Arc::new(MemoryRepository::new())
    }

    fn ingredient(name: &str, qty: f64, unit: &str) -> Ingredient {
        Ingredient {
            id: None,
            name: name.into(),
            quantity: Some(qty),
            unit: Some(unit.into()),
        }
    }

    fn recipe(title: &str, ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            id: None,
            title: title.into(),
            description: None,
            ingredients,
            prep_time: None,
            cook_time: None,
            author_id: None,
            children: Vec::new(),
            tags: Vec::new(),
            reviews: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_normalizes_ingredients_and_stamps_author() {
        let recipes = repo();
        let author = Uuid::new_v4();
        let saved = create_recipe(
            &recipes,
            recipe("Soup", vec![ingredient("Flour", 1.0, "kg")]),
            author,
        )
        .await
        .unwrap();

        assert_eq!(saved.author_id, Some(author));
        assert_eq!(saved.ingredients[0].quantity, Some(1000.0));
        assert_eq!(saved.ingredients[0].unit.as_deref(), Some("g"));
    }

    #[tokio::test]
    async fn create_normalizes_nested_children() {
        let recipes = repo();
        let mut parent = recipe("Cake", vec![]);
        parent.children.push(recipe(
            "Frosting",
            vec![ingredient("Milk", 2.0, "tbsp")],
        ));
        let saved = create_recipe(&recipes, parent, Uuid::new_v4()).await.unwrap();
        assert_eq!(saved.children[0].ingredients[0].quantity, Some(30.0));
        assert_eq!(saved.children[0].ingredients[0].unit.as_deref(), Some("ml"));
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let recipes = repo();
        let err = create_recipe(&recipes, recipe("   ", vec![]), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(recipes.read(Query::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_by_non_author_is_denied_and_store_untouched() {
        let recipes = repo();
        let author = Uuid::new_v4();
        let saved = create_recipe(&recipes, recipe("Soup", vec![]), author)
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let stranger = Uuid::new_v4();
        let err = update_recipe(&recipes, id, recipe("Hijacked", vec![]), stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied(_)));
        assert!(err.to_string().contains("Only the author"));

        let fresh = read_recipe_by_id(&recipes, id).await.unwrap();
        assert_eq!(fresh.title, "Soup");
    }

    #[tokio::test]
    async fn update_of_missing_recipe_reports_not_found() {
        let recipes = repo();
        let err = update_recipe(&recipes, Uuid::new_v4(), recipe("X", vec![]), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied(_)));
        assert!(err.to_string().contains("Recipe not found"));
    }

    #[tokio::test]
    async fn update_by_author_persists_and_normalizes() {
        let recipes = repo();
        let author = Uuid::new_v4();
        let saved = create_recipe(&recipes, recipe("Soup", vec![]), author)
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let updated = update_recipe(
            &recipes,
            id,
            recipe("Thick Soup", vec![ingredient("Water", 1.0, "l")]),
            author,
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Thick Soup");
        assert_eq!(updated.ingredients[0].quantity, Some(1000.0));
        assert_eq!(updated.ingredients[0].unit.as_deref(), Some("ml"));
        // author survives a full-field update
        assert_eq!(updated.author_id, Some(author));
    }

    #[tokio::test]
    async fn delete_by_non_author_is_denied() {
        let recipes = repo();
        let author = Uuid::new_v4();
        let saved = create_recipe(&recipes, recipe("Soup", vec![]), author)
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let err = delete_recipe(&recipes, id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied(_)));
        assert_eq!(recipes.read(Query::new()).await.unwrap().len(), 1);

        delete_recipe(&recipes, id, author).await.unwrap();
        assert!(recipes.read(Query::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_filters_by_title_substring() {
        let recipes = repo();
        let author = Uuid::new_v4();
        create_recipe(&recipes, recipe("Tomato Soup", vec![]), author)
            .await
            .unwrap();
        create_recipe(&recipes, recipe("Pancakes", vec![]), author)
            .await
            .unwrap();

        let hits = read_recipes(&recipes, Some("soup")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Tomato Soup");

        let all = read_recipes(&recipes, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn ingredient_names_are_deduplicated_and_sorted() {
        let recipes = repo();
        let author = Uuid::new_v4();
        create_recipe(
            &recipes,
            recipe(
                "A",
                vec![ingredient("Salt", 1.0, "g"), ingredient("Flour", 1.0, "kg")],
            ),
            author,
        )
        .await
        .unwrap();
        create_recipe(&recipes, recipe("B", vec![ingredient("Salt", 2.0, "g")]), author)
            .await
            .unwrap();

        let names = ingredient_names(&recipes).await.unwrap();
        assert_eq!(names, vec!["Flour".to_string(), "Salt".to_string()]);
    }

    #[tokio::test]
    async fn any_user_can_review_and_gets_the_review_back() {
        let recipes = repo();
        let author = Uuid::new_v4();
        let saved = create_recipe(&recipes, recipe("Soup", vec![]), author)
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let reviewer = Uuid::new_v4();
        let review = add_review(&recipes, id, reviewer, "grace", 5, "Delicious".into())
            .await
            .unwrap();
        assert_eq!(review.user_id, reviewer);
        assert_eq!(review.username, "grace");
        assert_eq!(review.rating, 5);

        let fresh = read_recipe_by_id(&recipes, id).await.unwrap();
        assert_eq!(fresh.reviews.len(), 1);
        assert_eq!(fresh.reviews[0].id, review.id);
    }

    #[tokio::test]
    async fn review_on_missing_recipe_is_not_found() {
        let recipes = repo();
        let err = add_review(&recipes, Uuid::new_v4(), Uuid::new_v4(), "grace", 4, "".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
