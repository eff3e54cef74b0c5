use chrono::{Duration, Local};
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::constants::SESSION_TTL_HOURS;
use crate::error::ApiError;
use crate::schema::{User, Uuid};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionData {
    pub user_id: Uuid,
    pub email: String,
    iat: i64,
    exp: i64,
}

impl SessionData {
    pub fn new(user: &User) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + Duration::hours(SESSION_TTL_HOURS)).timestamp();

        Self {
            user_id: user.id,
            email: user.email.to_owned(),
            iat,
            exp,
        }
    }
}

fn session_key(secret: &[u8]) -> Result<Hmac<Sha256>, ApiError> {
    Hmac::new_from_slice(secret).map_err(|e| ApiError::Internal(format!("invalid session key: {e}")))
}

pub fn generate_jwt_session(user: &User, secret: &[u8]) -> Result<String, ApiError> {
    let key = session_key(secret)?;
    let claims = SessionData::new(user);

    claims
        .sign_with_key(&key)
        .map_err(|e| ApiError::Internal(format!("failed to sign session: {e}")))
}

pub fn verify_jwt_session(token: &str, secret: &[u8]) -> Result<SessionData, ApiError> {
    let key = session_key(secret)?;

    let session: SessionData = token
        .verify_with_key(&key)
        .map_err(|_| ApiError::AuthenticationRequired)?;

    if session.exp <= Local::now().timestamp() {
        return Err(ApiError::AuthenticationRequired);
    }
    Ok(session)
}
