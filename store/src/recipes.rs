//! Recipe persistence.

use diesel::prelude::*;
use meal_planner_core::{Recipe, RecipeDraft};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{current_timestamp, format_timestamp, NewRecipe, RecipeChanges, RecipeRow};
use crate::schema::recipes;

/// Validate and insert a new recipe with a fresh id.
pub fn create_recipe(conn: &mut SqliteConnection, draft: &RecipeDraft) -> Result<Recipe, StoreError> {
    draft.validate()?;

    let id = Uuid::new_v4();
    let now = current_timestamp();
    let new_recipe = NewRecipe {
        id: id.to_string(),
        name: &draft.name,
        ingredients: serde_json::to_string(&draft.ingredients)?,
        instructions: serde_json::to_string(&draft.instructions)?,
        created_at: format_timestamp(now),
        updated_at: format_timestamp(now),
        makes_min: draft.makes_min,
        makes_max: draft.makes_max,
        makes_unit: draft.makes_unit.as_deref(),
    };

    diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .execute(conn)?;

    tracing::info!(recipe_id = %id, name = %draft.name, "Created recipe");

    Ok(Recipe {
        id,
        content: draft.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// All recipes, oldest first, ties broken by name.
///
/// Sorted after decoding: stored timestamps come in more than one text
/// format, so SQL ordering on the column would not be chronological.
pub fn list_recipes(conn: &mut SqliteConnection) -> Result<Vec<Recipe>, StoreError> {
    let mut list = recipes::table
        .select(RecipeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(RecipeRow::into_recipe)
        .collect::<Result<Vec<_>, _>>()?;

    list.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.content.name.cmp(&b.content.name))
    });
    Ok(list)
}

pub fn get_recipe(conn: &mut SqliteConnection, id: Uuid) -> Result<Recipe, StoreError> {
    recipes::table
        .find(id.to_string())
        .select(RecipeRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::RecipeNotFound(id))?
        .into_recipe()
}

/// Replace a recipe's content. `created_at` is kept and `updated_at` set to now.
pub fn update_recipe(
    conn: &mut SqliteConnection,
    id: Uuid,
    draft: &RecipeDraft,
) -> Result<Recipe, StoreError> {
    draft.validate()?;

    conn.transaction(|conn| {
        let existing = get_recipe(conn, id)?;
        let now = current_timestamp();

        let changes = RecipeChanges {
            name: &draft.name,
            ingredients: serde_json::to_string(&draft.ingredients)?,
            instructions: serde_json::to_string(&draft.instructions)?,
            updated_at: format_timestamp(now),
            makes_min: draft.makes_min,
            makes_max: draft.makes_max,
            makes_unit: draft.makes_unit.as_deref(),
        };

        diesel::update(recipes::table.find(id.to_string()))
            .set(&changes)
            .execute(conn)?;

        tracing::info!(recipe_id = %id, "Updated recipe");

        Ok(Recipe {
            id,
            content: draft.clone(),
            created_at: existing.created_at,
            updated_at: now,
        })
    })
}

pub fn delete_recipe(conn: &mut SqliteConnection, id: Uuid) -> Result<(), StoreError> {
    let deleted = diesel::delete(recipes::table.find(id.to_string())).execute(conn)?;
    if deleted == 0 {
        return Err(StoreError::RecipeNotFound(id));
    }
    tracing::info!(recipe_id = %id, "Deleted recipe");
    Ok(())
}

/// Delete every recipe. Returns the number of rows removed.
pub fn delete_all_recipes(conn: &mut SqliteConnection) -> Result<usize, StoreError> {
    let deleted = diesel::delete(recipes::table).execute(conn)?;
    tracing::warn!(deleted, "Deleted all recipes");
    Ok(deleted)
}
