use crate::db::{self, DbPool};
use crate::errors::{AppError, ErrorReport};
use super::types::{NewUser, User};

const SELECT_USER: &str =
    "SELECT id, username, email, password, is_staff, created_at FROM users";

/// Create a user, returning the new id. A duplicate username surfaces as a
/// field-level validation report rather than a bare database error.
pub async fn create(pool: &DbPool, new_user: &NewUser) -> Result<i64, AppError> {
    let result = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password)
    .fetch_one(pool)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(e) if db::is_unique_violation(&e) => Err(AppError::Validation(ErrorReport::field(
            "username",
            "A user with that username already exists.",
        ))),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_all(pool: &DbPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn set_staff(pool: &DbPool, id: i64, is_staff: bool) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET is_staff = $1 WHERE id = $2")
        .bind(is_staff)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
