use std::sync::Arc;

use sqlx::{Pool, Postgres};
use warp::{http::StatusCode, Rejection, Reply};

use crate::{
    actions::{ingredients, recipes, tags, users},
    constants::SESSION_COOKIE,
    error::ApiError,
    form::{Credentials, NamePatch, NewRecipe, NewUser, RecipePatch, RecipeUpdate, UserPatch},
    jwt::SessionData,
    schema::{UserRow, Uuid},
};

pub async fn register(form: NewUser, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let user = users::create_user(form, &pool).await?;

    Ok(warp::reply::with_status(
        warp::reply::json(&UserRow::from(user)),
        StatusCode::CREATED,
    ))
}

/// Issues a session token as both a cookie and a response body.
pub async fn login(
    form: Credentials,
    secret: Arc<String>,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let token = users::login_user(&form.email, &form.password, secret.as_bytes(), &pool).await?;

    let body = warp::reply::json(&serde_json::json!({ "token": token }));
    let cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/");

    Ok(warp::reply::with_header(body, "set-cookie", cookie))
}

pub async fn me(session: SessionData, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let user = users::get_user_by_id(&pool, session.user_id)
        .await?
        .ok_or(ApiError::AuthenticationRequired)?;

    Ok(warp::reply::json(&UserRow::from(user)))
}

pub async fn update_me(
    session: SessionData,
    patch: UserPatch,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let user = users::update_user(session.user_id, patch, &pool).await?;

    Ok(warp::reply::json(&UserRow::from(user)))
}

pub async fn list_recipes(
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let list = recipes::list_recipes(session.user_id, &pool).await?;

    Ok(warp::reply::json(&list))
}

pub async fn create_recipe(
    session: SessionData,
    form: NewRecipe,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let detail = recipes::create_recipe(session.user_id, form, &pool).await?;

    Ok(warp::reply::with_status(
        warp::reply::json(&detail),
        StatusCode::CREATED,
    ))
}

pub async fn get_recipe(
    recipe_id: Uuid,
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let detail = recipes::get_recipe_detail(session.user_id, recipe_id, &pool).await?;

    Ok(warp::reply::json(&detail))
}

pub async fn patch_recipe(
    recipe_id: Uuid,
    session: SessionData,
    patch: RecipePatch,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let detail = recipes::update_recipe(session.user_id, recipe_id, patch, &pool).await?;

    Ok(warp::reply::json(&detail))
}

pub async fn put_recipe(
    recipe_id: Uuid,
    session: SessionData,
    update: RecipeUpdate,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let detail = recipes::update_recipe(session.user_id, recipe_id, update.into(), &pool).await?;

    Ok(warp::reply::json(&detail))
}

pub async fn delete_recipe(
    recipe_id: Uuid,
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    recipes::delete_recipe(session.user_id, recipe_id, &pool).await?;

    Ok(warp::reply::with_status(
        warp::reply::reply(),
        StatusCode::NO_CONTENT,
    ))
}

pub async fn list_tags(session: SessionData, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let list = tags::list_tags(session.user_id, &pool).await?;

    Ok(warp::reply::json(&list))
}

pub async fn patch_tag(
    tag_id: Uuid,
    session: SessionData,
    patch: NamePatch,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    patch.validate()?;
    let tag = tags::update_tag(session.user_id, tag_id, &patch.name, &pool).await?;

    Ok(warp::reply::json(&tag))
}

pub async fn delete_tag(
    tag_id: Uuid,
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    tags::delete_tag(session.user_id, tag_id, &pool).await?;

    Ok(warp::reply::with_status(
        warp::reply::reply(),
        StatusCode::NO_CONTENT,
    ))
}

pub async fn list_ingredients(
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let list = ingredients::list_ingredients(session.user_id, &pool).await?;

    Ok(warp::reply::json(&list))
}

pub async fn patch_ingredient(
    ingredient_id: Uuid,
    session: SessionData,
    patch: NamePatch,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    patch.validate()?;
    let ingredient =
        ingredients::update_ingredient(session.user_id, ingredient_id, &patch.name, &pool).await?;

    Ok(warp::reply::json(&ingredient))
}

pub async fn delete_ingredient(
    ingredient_id: Uuid,
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    ingredients::delete_ingredient(session.user_id, ingredient_id, &pool).await?;

    Ok(warp::reply::with_status(
        warp::reply::reply(),
        StatusCode::NO_CONTENT,
    ))
}
