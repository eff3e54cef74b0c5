use sqlx::{Pool, Postgres};

use crate::{
    authentication::cryptography::{hash_password, verify_password},
    authentication::jwt::generate_jwt_session,
    error::ApiError,
    form::{NewUser, UserPatch},
    schema::{User, Uuid},
};

/// Lowercases the domain part of an email address. The local part is kept
/// as given, `Test2@Example.com` stays distinct from `test2@example.com`.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Creates a user with a normalized email and a hashed password.
pub async fn create_user(form: NewUser, pool: &Pool<Postgres>) -> Result<User, ApiError> {
    if form.email.trim().is_empty() {
        return Err(ApiError::validation("email", "must not be empty"));
    }

    let email = normalize_email(&form.email);
    let password = hash_password(&form.password)?;

    let user: Option<User> = sqlx::query_as(
        "
        INSERT INTO users (email, password, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING RETURNING *;
    ",
    )
    .bind(&email)
    .bind(&password)
    .bind(&form.name)
    .fetch_optional(pool)
    .await?;

    user.ok_or_else(|| ApiError::validation("email", "already in use"))
}

pub async fn create_superuser(
    email: &str,
    password: &str,
    pool: &Pool<Postgres>,
) -> Result<User, ApiError> {
    let user = create_user(
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            name: String::new(),
        },
        pool,
    )
    .await?;

    let user: User =
        sqlx::query_as("UPDATE users SET is_staff = TRUE, is_superuser = TRUE WHERE id = $1 RETURNING *")
            .bind(user.id)
            .fetch_one(pool)
            .await?;

    Ok(user)
}

pub async fn get_user(pool: &Pool<Postgres>, email: &str) -> Result<Option<User>, ApiError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<User>, ApiError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Checks the credentials and returns a signed session token. The response
/// never reveals whether the email or the password was the wrong half.
pub async fn login_user(
    email: &str,
    password: &str,
    secret: &[u8],
    pool: &Pool<Postgres>,
) -> Result<String, ApiError> {
    let invalid = || ApiError::validation("credentials", "invalid email or password");

    let user = get_user(pool, &normalize_email(email)).await?.ok_or_else(invalid)?;
    if !user.is_active || !verify_password(password, &user.password)? {
        return Err(invalid());
    }

    generate_jwt_session(&user, secret)
}

/// Partial update of the caller's own account. A new password is hashed
/// before it reaches the store.
pub async fn update_user(
    user_id: Uuid,
    patch: UserPatch,
    pool: &Pool<Postgres>,
) -> Result<User, ApiError> {
    let password = match &patch.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user: Option<User> = sqlx::query_as(
        "
        UPDATE users SET
        name = COALESCE($1, name),
        password = COALESCE($2, password)
        WHERE id = $3
        RETURNING *;
    ",
    )
    .bind(&patch.name)
    .bind(&password)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    user.ok_or(ApiError::NotFound)
}
