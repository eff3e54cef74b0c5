use std::convert::Infallible;
use std::sync::Arc;

use sqlx::{Pool, Postgres};
use warp::{Filter, Rejection};

use crate::constants::SESSION_COOKIE;
use crate::error::ApiError;

use super::jwt::{verify_jwt_session, SessionData};

pub fn with_pool(
    pool: Pool<Postgres>,
) -> impl Filter<Extract = (Pool<Postgres>,), Error = Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

pub fn with_secret(
    secret: Arc<String>,
) -> impl Filter<Extract = (Arc<String>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&secret))
}

/// Extracts and verifies the session cookie. A missing, invalid or expired
/// cookie rejects with `ApiError::AuthenticationRequired` (401).
pub fn with_session(
    secret: Arc<String>,
) -> impl Filter<Extract = (SessionData,), Error = Rejection> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE).and_then(move |cookie: Option<String>| {
        let secret = Arc::clone(&secret);
        async move {
            match cookie {
                Some(token) => {
                    verify_jwt_session(&token, secret.as_bytes()).map_err(Rejection::from)
                }
                None => Err(ApiError::AuthenticationRequired.into()),
            }
        }
    })
}
