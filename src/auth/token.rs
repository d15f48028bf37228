use rand::Rng;

use crate::db::DbPool;
use crate::errors::AppError;

/// Generate a random 20-byte opaque key, hex-encoded (40 chars).
pub fn generate_key() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 20] = rng.random();
    hex::encode(bytes)
}

/// Return the user's API token, creating one if none exists yet.
/// Tokens are issued once per user and never rotated here.
pub async fn ensure(pool: &DbPool, user_id: i64) -> Result<String, AppError> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT key FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    if let Some(key) = existing {
        return Ok(key);
    }

    let key = generate_key();
    sqlx::query("INSERT INTO auth_tokens (key, user_id) VALUES ($1, $2)")
        .bind(&key)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(key)
}

/// Resolve a token key to the owning user's id.
pub async fn find_user_id_by_key(pool: &DbPool, key: &str) -> Result<Option<i64>, AppError> {
    let user_id: Option<i64> =
        sqlx::query_scalar("SELECT user_id FROM auth_tokens WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(user_id)
}
