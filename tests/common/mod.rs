#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use tokio::sync::OnceCell;
use warp::{filters::BoxedFilter, reply::Reply, test::request};

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "testpass123";

static COUNTER: AtomicU32 = AtomicU32::new(0);
static SCHEMA: OnceCell<()> = OnceCell::const_new();

/// Connects to DATABASE_URL and applies schema.sql. Returns None when no
/// database is configured so a plain `cargo test` run stays green; set
/// DATABASE_URL to a scratch Postgres instance to exercise these tests.
pub async fn try_pool() -> Option<Pool<Postgres>> {
    dotenvy::dotenv().ok();
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL is not set, skipping");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("DATABASE_URL is set but the database is unreachable");

    SCHEMA
        .get_or_init(|| async {
            // one connection for the whole setup, the advisory lock guards
            // against a second test binary doing the same concurrently
            let mut conn = pool.acquire().await.expect("no connection for schema setup");
            sqlx::query("SELECT pg_advisory_lock(883271)")
                .execute(&mut *conn)
                .await
                .expect("failed to take the schema lock");
            for statement in include_str!("../../schema.sql").split(';') {
                let statement = statement.trim();
                if !statement.is_empty() {
                    sqlx::query(statement)
                        .execute(&mut *conn)
                        .await
                        .expect("failed to apply schema.sql");
                }
            }
            sqlx::query("SELECT pg_advisory_unlock(883271)")
                .execute(&mut *conn)
                .await
                .expect("failed to release the schema lock");
        })
        .await;

    Some(pool)
}

pub fn api(pool: Pool<Postgres>) -> BoxedFilter<(impl Reply,)> {
    keittokirja::routes(pool, SECRET.to_string())
}

/// Unique address per call; tests run concurrently against a shared
/// database and rely on per-user scoping instead of truncation.
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}@example.com")
}

pub async fn signup<R>(api: &BoxedFilter<(R,)>, email: &str) -> Value
where
    R: Reply + Send + 'static,
{
    let res = request()
        .method("POST")
        .path("/users")
        .json(&json!({ "email": email, "password": PASSWORD, "name": "Test User" }))
        .reply(api)
        .await;
    assert_eq!(res.status(), 201, "signup failed: {:?}", res.body());

    serde_json::from_slice(res.body()).unwrap()
}

pub async fn login<R>(api: &BoxedFilter<(R,)>, email: &str) -> String
where
    R: Reply + Send + 'static,
{
    let res = request()
        .method("POST")
        .path("/users/token")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .reply(api)
        .await;
    assert_eq!(res.status(), 200, "login failed: {:?}", res.body());

    let body: Value = serde_json::from_slice(res.body()).unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Registers a fresh user and returns the cookie header value for it.
pub async fn session<R>(api: &BoxedFilter<(R,)>, prefix: &str) -> String
where
    R: Reply + Send + 'static,
{
    let email = unique_email(prefix);
    signup(api, &email).await;
    let token = login(api, &email).await;
    session_cookie(&token)
}

pub fn session_cookie(token: &str) -> String {
    format!("session={token}")
}

pub fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}
