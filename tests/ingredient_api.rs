mod common;

use serde_json::{json, Value};
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::test::request;

async fn create_recipe_with_ingredients<R>(
    api: &BoxedFilter<(R,)>,
    cookie: &str,
    ingredients: Value,
) -> Value
where
    R: Reply + Send + 'static,
{
    let res = request()
        .method("POST")
        .path("/recipes")
        .header("cookie", cookie)
        .json(&json!({
            "title": "Carrier",
            "time_minutes": 1,
            "price": "1.00",
            "ingredients": ingredients
        }))
        .reply(api)
        .await;
    assert_eq!(res.status(), 201, "recipe create failed: {:?}", res.body());
    common::body_json(res.body())
}

async fn list_ingredients<R>(api: &BoxedFilter<(R,)>, cookie: &str) -> Value
where
    R: Reply + Send + 'static,
{
    let res = request()
        .method("GET")
        .path("/ingredients")
        .header("cookie", cookie)
        .reply(api)
        .await;
    assert_eq!(res.status(), 200);
    common::body_json(res.body())
}

#[tokio::test]
async fn ingredients_require_authentication() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);

    let res = request()
        .method("GET")
        .path("/ingredients")
        .reply(&api)
        .await;
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn ingredients_are_scoped_and_ordered_by_name_descending() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);
    let cookie_a = common::session(&api, "ing-a").await;
    let cookie_b = common::session(&api, "ing-b").await;

    create_recipe_with_ingredients(&api, &cookie_a, json!([{"name": "Kale"}, {"name": "Salt"}]))
        .await;
    create_recipe_with_ingredients(&api, &cookie_b, json!([{"name": "Vinegar"}])).await;

    let names: Vec<String> = list_ingredients(&api, &cookie_a)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|ingredient| ingredient["name"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(names, ["Salt", "Kale"]);
}

#[tokio::test]
async fn repeated_resolution_reuses_ingredient_rows() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);
    let cookie = common::session(&api, "ing-reuse").await;

    create_recipe_with_ingredients(&api, &cookie, json!([{"name": "Lemon"}])).await;
    create_recipe_with_ingredients(&api, &cookie, json!([{"name": "Lemon"}])).await;

    let ingredients = list_ingredients(&api, &cookie).await;
    assert_eq!(ingredients.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rename_and_delete_an_ingredient() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);
    let cookie = common::session(&api, "ing-mutate").await;

    let recipe = create_recipe_with_ingredients(&api, &cookie, json!([{"name": "Cilantro"}])).await;
    let ingredient_id = recipe["ingredients"][0]["id"].as_i64().unwrap();

    let res = request()
        .method("PATCH")
        .path(&format!("/ingredients/{ingredient_id}"))
        .header("cookie", &cookie)
        .json(&json!({"name": "Coriander"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 200);
    assert_eq!(common::body_json(res.body())["name"], "Coriander");

    let res = request()
        .method("DELETE")
        .path(&format!("/ingredients/{ingredient_id}"))
        .header("cookie", &cookie)
        .reply(&api)
        .await;
    assert_eq!(res.status(), 204);
    assert_eq!(list_ingredients(&api, &cookie).await, json!([]));
}

#[tokio::test]
async fn foreign_ingredients_are_not_found() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);
    let cookie_a = common::session(&api, "ing-foreign-a").await;
    let cookie_b = common::session(&api, "ing-foreign-b").await;

    let recipe = create_recipe_with_ingredients(&api, &cookie_a, json!([{"name": "Mine"}])).await;
    let ingredient_id = recipe["ingredients"][0]["id"].as_i64().unwrap();

    let res = request()
        .method("PATCH")
        .path(&format!("/ingredients/{ingredient_id}"))
        .header("cookie", &cookie_b)
        .json(&json!({"name": "Stolen"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 404);

    let res = request()
        .method("DELETE")
        .path(&format!("/ingredients/{ingredient_id}"))
        .header("cookie", &cookie_b)
        .reply(&api)
        .await;
    assert_eq!(res.status(), 404);
}
