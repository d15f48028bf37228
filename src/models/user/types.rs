use serde::Serialize;

/// Full user row, password hash included. Never serialized directly.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_staff: bool,
    pub created_at: String,
}

/// Input for user creation; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User as exposed by the read-only user listing, with owned snippet ids.
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub id: i64,
    pub username: String,
    pub snippets: Vec<i64>,
}
