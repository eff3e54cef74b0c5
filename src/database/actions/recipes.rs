use sqlx::{Pool, Postgres};

use crate::{
    error::ApiError,
    form::{NewRecipe, RecipePatch},
    schema::{Recipe, RecipeDetail, RecipeRow, Uuid},
};

use super::ingredients::{
    attach_ingredients, clear_recipe_ingredients, collect_ingredients_by_recipe,
    list_recipe_ingredients, resolve_or_create_ingredients,
};
use super::tags::{
    attach_tags, clear_recipe_tags, collect_tags_by_recipe, list_recipe_tags,
    resolve_or_create_tags,
};

/// Creates a recipe owned by `user_id` and attaches the resolved tag and
/// ingredient sets. Ownership comes from the session alone, the payload
/// carries no owner field.
pub async fn create_recipe(
    user_id: Uuid,
    form: NewRecipe,
    pool: &Pool<Postgres>,
) -> Result<RecipeDetail, ApiError> {
    form.validate()?;

    let recipe: Recipe = sqlx::query_as(
        "
        INSERT INTO recipes (user_id, title, description, time_minutes, price, link)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *;
    ",
    )
    .bind(user_id)
    .bind(&form.title)
    .bind(&form.description)
    .bind(form.time_minutes)
    .bind(form.price)
    .bind(&form.link)
    .fetch_one(pool)
    .await?;

    let tags = resolve_or_create_tags(user_id, &form.tags, pool).await?;
    attach_tags(recipe.id, &tags, pool).await?;

    let ingredients = resolve_or_create_ingredients(user_id, &form.ingredients, pool).await?;
    attach_ingredients(recipe.id, &ingredients, pool).await?;

    Ok(recipe.into_detail(
        tags.into_iter().map(Into::into).collect(),
        ingredients.into_iter().map(Into::into).collect(),
    ))
}

/// Fetches a recipe scoped to its owner. A row owned by somebody else comes
/// back as `None`, indistinguishable from an absent row.
pub async fn get_recipe(
    user_id: Uuid,
    recipe_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Option<Recipe>, ApiError> {
    let row: Option<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(recipe_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row)
}

pub async fn get_recipe_detail(
    user_id: Uuid,
    recipe_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<RecipeDetail, ApiError> {
    let recipe = get_recipe(user_id, recipe_id, pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    let tags = list_recipe_tags(recipe.id, pool).await?;
    let ingredients = list_recipe_ingredients(recipe.id, pool).await?;

    Ok(recipe.into_detail(tags, ingredients))
}

/// Lists the caller's recipes, newest first.
pub async fn list_recipes(user_id: Uuid, pool: &Pool<Postgres>) -> Result<Vec<RecipeRow>, ApiError> {
    let rows: Vec<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE user_id = $1 ORDER BY id DESC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    let mut tags = collect_tags_by_recipe(user_id, pool).await?;
    let mut ingredients = collect_ingredients_by_recipe(user_id, pool).await?;

    Ok(rows
        .into_iter()
        .map(|recipe| {
            let recipe_tags = tags.remove(&recipe.id).unwrap_or_default();
            let recipe_ingredients = ingredients.remove(&recipe.id).unwrap_or_default();
            recipe.into_row(recipe_tags, recipe_ingredients)
        })
        .collect())
}

/// Applies a partial update. When the patch carries a tag list, the current
/// associations are cleared first and the new set is resolved and attached,
/// so an explicit empty list clears all tags while an omitted field leaves
/// them untouched. Ingredients follow the same rule. Scalar fields not
/// present in the patch keep their value.
pub async fn update_recipe(
    user_id: Uuid,
    recipe_id: Uuid,
    patch: RecipePatch,
    pool: &Pool<Postgres>,
) -> Result<RecipeDetail, ApiError> {
    patch.validate()?;

    let recipe = get_recipe(user_id, recipe_id, pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(descriptors) = &patch.tags {
        clear_recipe_tags(recipe.id, pool).await?;
        let tags = resolve_or_create_tags(user_id, descriptors, pool).await?;
        attach_tags(recipe.id, &tags, pool).await?;
    }

    if let Some(descriptors) = &patch.ingredients {
        clear_recipe_ingredients(recipe.id, pool).await?;
        let ingredients = resolve_or_create_ingredients(user_id, descriptors, pool).await?;
        attach_ingredients(recipe.id, &ingredients, pool).await?;
    }

    let updated: Option<Recipe> = sqlx::query_as(
        "
        UPDATE recipes SET
        title = COALESCE($1, title),
        description = COALESCE($2, description),
        time_minutes = COALESCE($3, time_minutes),
        price = COALESCE($4, price),
        link = COALESCE($5, link)
        WHERE id = $6 AND user_id = $7
        RETURNING *;
    ",
    )
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(patch.time_minutes)
    .bind(patch.price)
    .bind(&patch.link)
    .bind(recipe.id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    let updated = updated.ok_or(ApiError::NotFound)?;

    let tags = list_recipe_tags(updated.id, pool).await?;
    let ingredients = list_recipe_ingredients(updated.id, pool).await?;

    Ok(updated.into_detail(tags, ingredients))
}

pub async fn delete_recipe(
    user_id: Uuid,
    recipe_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
        .bind(recipe_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}
