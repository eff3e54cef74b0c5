use std::collections::HashMap;

use sqlx::{Pool, Postgres};

use crate::{
    error::ApiError,
    form::TagInput,
    schema::{RecipeTagLink, Tag, TagRow, Uuid},
};

/// Finds the tag owned by `user_id` with this name, creating it when absent.
/// The unique index on (user_id, name) makes the insert race safe: when a
/// concurrent request wins the insert, ours affects no row and the re-select
/// picks up the winner.
pub async fn get_or_create_tag(
    user_id: Uuid,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<Tag, ApiError> {
    let inserted: Option<Tag> = sqlx::query_as(
        "INSERT INTO tags (user_id, name) VALUES ($1, $2) ON CONFLICT (user_id, name) DO NOTHING RETURNING *",
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(tag) => Ok(tag),
        None => {
            let tag: Tag = sqlx::query_as("SELECT * FROM tags WHERE user_id = $1 AND name = $2")
                .bind(user_id)
                .bind(name)
                .fetch_one(pool)
                .await?;

            Ok(tag)
        }
    }
}

/// Resolves tag descriptors to rows owned by `user_id`, creating the missing
/// ones. Duplicate names within one call resolve to a single row. Existing
/// rows are never mutated or deleted here.
pub async fn resolve_or_create_tags(
    user_id: Uuid,
    descriptors: &[TagInput],
    pool: &Pool<Postgres>,
) -> Result<Vec<Tag>, ApiError> {
    let mut resolved: Vec<Tag> = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if descriptor.name.trim().is_empty() {
            return Err(ApiError::validation("tags", "tag name must not be empty"));
        }
        if resolved.iter().any(|tag| tag.name == descriptor.name) {
            continue;
        }
        resolved.push(get_or_create_tag(user_id, &descriptor.name, pool).await?);
    }

    Ok(resolved)
}

pub async fn list_tags(user_id: Uuid, pool: &Pool<Postgres>) -> Result<Vec<TagRow>, ApiError> {
    let list: Vec<TagRow> =
        sqlx::query_as("SELECT id, name FROM tags WHERE user_id = $1 ORDER BY name DESC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(list)
}

/// Renames a tag. A tag owned by somebody else is reported as absent.
pub async fn update_tag(
    user_id: Uuid,
    tag_id: Uuid,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<TagRow, ApiError> {
    let updated: Option<TagRow> = sqlx::query_as(
        "UPDATE tags SET name = $1 WHERE id = $2 AND user_id = $3 RETURNING id, name",
    )
    .bind(name)
    .bind(tag_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(unique_name_taken)?;

    updated.ok_or(ApiError::NotFound)
}

/// A rename can trip the (user_id, name) unique index; that is a caller
/// mistake, not a server fault.
pub(super) fn unique_name_taken(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return ApiError::validation("name", "already in use");
        }
    }
    ApiError::from(e)
}

pub async fn delete_tag(user_id: Uuid, tag_id: Uuid, pool: &Pool<Postgres>) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
        .bind(tag_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

pub async fn list_recipe_tags(
    recipe_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Vec<TagRow>, ApiError> {
    let list: Vec<TagRow> = sqlx::query_as(
        "
        SELECT t.id AS id, t.name AS name
        FROM recipe_tags m
        INNER JOIN tags t ON t.id = m.tag_id
        WHERE m.recipe_id = $1
        ORDER BY t.id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}

/// Collects the tag sets of every recipe owned by `user_id` in one query,
/// keyed by recipe id.
pub async fn collect_tags_by_recipe(
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<TagRow>>, ApiError> {
    let links: Vec<RecipeTagLink> = sqlx::query_as(
        "
        SELECT m.recipe_id AS recipe_id, t.id AS id, t.name AS name
        FROM recipe_tags m
        INNER JOIN tags t ON t.id = m.tag_id
        INNER JOIN recipes r ON r.id = m.recipe_id
        WHERE r.user_id = $1
        ORDER BY t.id
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<Uuid, Vec<TagRow>> = HashMap::new();
    links.into_iter().for_each(|link| {
        map.entry(link.recipe_id).or_default().push(TagRow {
            id: link.id,
            name: link.name,
        });
    });

    Ok(map)
}

pub async fn attach_tags(
    recipe_id: Uuid,
    tags: &[Tag],
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    for tag in tags {
        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(tag.id)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn clear_recipe_tags(recipe_id: Uuid, pool: &Pool<Postgres>) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(())
}
