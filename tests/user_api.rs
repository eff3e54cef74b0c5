mod common;

use serde_json::json;
use warp::test::request;

#[tokio::test]
async fn register_returns_the_public_shape() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);

    let email = common::unique_email("Register").replace("example.com", "EXAMPLE.com");
    let res = request()
        .method("POST")
        .path("/users")
        .json(&json!({"email": email, "password": common::PASSWORD, "name": "Test User"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 201);

    let body = common::body_json(res.body());
    assert!(body["id"].is_i64());
    assert_eq!(body["name"], "Test User");
    // the domain part is lowercased, the hash never leaves the store
    assert_eq!(body["email"], email.replace("EXAMPLE.com", "example.com"));
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn register_requires_an_email() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);

    let res = request()
        .method("POST")
        .path("/users")
        .json(&json!({"email": "", "password": common::PASSWORD}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 400);

    let body = common::body_json(res.body());
    assert!(body["errors"].get("email").is_some());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);

    let email = common::unique_email("dup");
    common::signup(&api, &email).await;

    let res = request()
        .method("POST")
        .path("/users")
        .json(&json!({"email": email, "password": common::PASSWORD}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn token_flow_grants_access_to_the_account() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);

    let email = common::unique_email("token");
    common::signup(&api, &email).await;

    let res = request()
        .method("POST")
        .path("/users/token")
        .json(&json!({"email": email, "password": "wrong-password"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 400);

    let token = common::login(&api, &email).await;

    let res = request()
        .method("GET")
        .path("/users/me")
        .header("cookie", common::session_cookie(&token))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 200);
    assert_eq!(common::body_json(res.body())["email"], email);

    let res = request().method("GET").path("/users/me").reply(&api).await;
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn superuser_factory_sets_both_flags() {
    let Some(pool) = common::try_pool().await else {
        return;
    };

    let email = common::unique_email("super");
    let user = keittokirja::actions::users::create_superuser(&email, common::PASSWORD, &pool)
        .await
        .unwrap();

    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert!(user.is_active);
}

#[tokio::test]
async fn update_own_name_and_password() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let api = common::api(pool);

    let email = common::unique_email("patch-me");
    common::signup(&api, &email).await;
    let token = common::login(&api, &email).await;
    let cookie = common::session_cookie(&token);

    let res = request()
        .method("PATCH")
        .path("/users/me")
        .header("cookie", &cookie)
        .json(&json!({"name": "Renamed", "password": "newpass456"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 200);
    assert_eq!(common::body_json(res.body())["name"], "Renamed");

    // the old password no longer works, the new one does
    let res = request()
        .method("POST")
        .path("/users/token")
        .json(&json!({"email": email, "password": common::PASSWORD}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 400);

    let res = request()
        .method("POST")
        .path("/users/token")
        .json(&json!({"email": email, "password": "newpass456"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), 200);
}
