use std::collections::HashMap;

use sqlx::{Pool, Postgres};

use crate::{
    error::ApiError,
    form::IngredientInput,
    schema::{Ingredient, IngredientRow, RecipeIngredientLink, Uuid},
};

/// Same find-or-insert contract as `tags::get_or_create_tag`, against the
/// independent ingredients table.
pub async fn get_or_create_ingredient(
    user_id: Uuid,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<Ingredient, ApiError> {
    let inserted: Option<Ingredient> = sqlx::query_as(
        "INSERT INTO ingredients (user_id, name) VALUES ($1, $2) ON CONFLICT (user_id, name) DO NOTHING RETURNING *",
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(ingredient) => Ok(ingredient),
        None => {
            let ingredient: Ingredient =
                sqlx::query_as("SELECT * FROM ingredients WHERE user_id = $1 AND name = $2")
                    .bind(user_id)
                    .bind(name)
                    .fetch_one(pool)
                    .await?;

            Ok(ingredient)
        }
    }
}

pub async fn resolve_or_create_ingredients(
    user_id: Uuid,
    descriptors: &[IngredientInput],
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, ApiError> {
    let mut resolved: Vec<Ingredient> = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if descriptor.name.trim().is_empty() {
            return Err(ApiError::validation(
                "ingredients",
                "ingredient name must not be empty",
            ));
        }
        if resolved
            .iter()
            .any(|ingredient| ingredient.name == descriptor.name)
        {
            continue;
        }
        resolved.push(get_or_create_ingredient(user_id, &descriptor.name, pool).await?);
    }

    Ok(resolved)
}

pub async fn list_ingredients(
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Vec<IngredientRow>, ApiError> {
    let list: Vec<IngredientRow> =
        sqlx::query_as("SELECT id, name FROM ingredients WHERE user_id = $1 ORDER BY name DESC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(list)
}

pub async fn update_ingredient(
    user_id: Uuid,
    ingredient_id: Uuid,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<IngredientRow, ApiError> {
    let updated: Option<IngredientRow> = sqlx::query_as(
        "UPDATE ingredients SET name = $1 WHERE id = $2 AND user_id = $3 RETURNING id, name",
    )
    .bind(name)
    .bind(ingredient_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(super::tags::unique_name_taken)?;

    updated.ok_or(ApiError::NotFound)
}

pub async fn delete_ingredient(
    user_id: Uuid,
    ingredient_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1 AND user_id = $2")
        .bind(ingredient_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

pub async fn list_recipe_ingredients(
    recipe_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Vec<IngredientRow>, ApiError> {
    let list: Vec<IngredientRow> = sqlx::query_as(
        "
        SELECT i.id AS id, i.name AS name
        FROM recipe_ingredients m
        INNER JOIN ingredients i ON i.id = m.ingredient_id
        WHERE m.recipe_id = $1
        ORDER BY i.id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}

pub async fn collect_ingredients_by_recipe(
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<IngredientRow>>, ApiError> {
    let links: Vec<RecipeIngredientLink> = sqlx::query_as(
        "
        SELECT m.recipe_id AS recipe_id, i.id AS id, i.name AS name
        FROM recipe_ingredients m
        INNER JOIN ingredients i ON i.id = m.ingredient_id
        INNER JOIN recipes r ON r.id = m.recipe_id
        WHERE r.user_id = $1
        ORDER BY i.id
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<Uuid, Vec<IngredientRow>> = HashMap::new();
    links.into_iter().for_each(|link| {
        map.entry(link.recipe_id).or_default().push(IngredientRow {
            id: link.id,
            name: link.name,
        });
    });

    Ok(map)
}

pub async fn attach_ingredients(
    recipe_id: Uuid,
    ingredients: &[Ingredient],
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    for ingredient in ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(ingredient.id)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn clear_recipe_ingredients(
    recipe_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(())
}
