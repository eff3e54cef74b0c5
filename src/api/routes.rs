use std::sync::Arc;

use serde::de::DeserializeOwned;
use sqlx::{Pool, Postgres};
use warp::{filters::BoxedFilter, Filter, Rejection, Reply};

use crate::{
    constants::MAX_BODY_BYTES,
    handlers,
    middleware::{with_pool, with_secret, with_session},
    rejection::handle_rejection,
};

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// The full route table. Everything except account creation and login runs
/// behind the session filter; rejections funnel into one JSON error handler.
pub fn routes(pool: Pool<Postgres>, secret: String) -> BoxedFilter<(impl Reply,)> {
    let secret = Arc::new(secret);
    let session = with_session(Arc::clone(&secret));
    let db = with_pool(pool);

    let register = warp::path!("users")
        .and(warp::post())
        .and(json_body())
        .and(db.clone())
        .and_then(handlers::register);

    let token = warp::path!("users" / "token")
        .and(warp::post())
        .and(json_body())
        .and(with_secret(Arc::clone(&secret)))
        .and(db.clone())
        .and_then(handlers::login);

    let me = warp::path!("users" / "me")
        .and(warp::get())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::me);

    let update_me = warp::path!("users" / "me")
        .and(warp::patch())
        .and(session.clone())
        .and(json_body())
        .and(db.clone())
        .and_then(handlers::update_me);

    let list_recipes = warp::path!("recipes")
        .and(warp::get())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::list_recipes);

    let create_recipe = warp::path!("recipes")
        .and(warp::post())
        .and(session.clone())
        .and(json_body())
        .and(db.clone())
        .and_then(handlers::create_recipe);

    let get_recipe = warp::path!("recipes" / i32)
        .and(warp::get())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::get_recipe);

    let patch_recipe = warp::path!("recipes" / i32)
        .and(warp::patch())
        .and(session.clone())
        .and(json_body())
        .and(db.clone())
        .and_then(handlers::patch_recipe);

    let put_recipe = warp::path!("recipes" / i32)
        .and(warp::put())
        .and(session.clone())
        .and(json_body())
        .and(db.clone())
        .and_then(handlers::put_recipe);

    let delete_recipe = warp::path!("recipes" / i32)
        .and(warp::delete())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::delete_recipe);

    let list_tags = warp::path!("tags")
        .and(warp::get())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::list_tags);

    let patch_tag = warp::path!("tags" / i32)
        .and(warp::patch())
        .and(session.clone())
        .and(json_body())
        .and(db.clone())
        .and_then(handlers::patch_tag);

    let delete_tag = warp::path!("tags" / i32)
        .and(warp::delete())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::delete_tag);

    let list_ingredients = warp::path!("ingredients")
        .and(warp::get())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::list_ingredients);

    let patch_ingredient = warp::path!("ingredients" / i32)
        .and(warp::patch())
        .and(session.clone())
        .and(json_body())
        .and(db.clone())
        .and_then(handlers::patch_ingredient);

    let delete_ingredient = warp::path!("ingredients" / i32)
        .and(warp::delete())
        .and(session.clone())
        .and(db.clone())
        .and_then(handlers::delete_ingredient);

    register
        .or(token)
        .or(me)
        .or(update_me)
        .or(list_recipes)
        .or(create_recipe)
        .or(get_recipe)
        .or(patch_recipe)
        .or(put_recipe)
        .or(delete_recipe)
        .or(list_tags)
        .or(patch_tag)
        .or(delete_tag)
        .or(list_ingredients)
        .or(patch_ingredient)
        .or(delete_ingredient)
        .recover(handle_rejection)
        .boxed()
}
