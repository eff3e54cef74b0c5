use std::convert::Infallible;

use serde_json::{json, Value};
use warp::{filters::body::BodyDeserializeError, http::StatusCode, reject, Rejection, Reply};

use crate::error::ApiError;

/// Maps every rejection to a JSON error response. Validation failures carry
/// the per-field messages, everything else a single `detail` line.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body): (StatusCode, Value) = if let Some(error) = err.find::<ApiError>() {
        match error {
            ApiError::Validation(fields) => (StatusCode::BAD_REQUEST, json!({ "errors": fields })),
            ApiError::Query(_) | ApiError::Internal(_) => {
                log::error!("request failed: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "internal server error" }),
                )
            }
            _ => (error.status(), json!({ "detail": error.to_string() })),
        }
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, json!({ "detail": "not found" }))
    } else if let Some(error) = err.find::<BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            json!({ "detail": error.to_string() }),
        )
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "detail": "method not allowed" }),
        )
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            json!({ "detail": "payload too large" }),
        )
    } else if err.find::<reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            json!({ "detail": "unsupported media type" }),
        )
    } else {
        log::error!("unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "detail": "internal server error" }),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
