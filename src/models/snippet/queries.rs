use crate::db::DbPool;
use crate::errors::AppError;
use super::types::{Snippet, SnippetPayload};

const SELECT_SNIPPET: &str = "SELECT id, title, code, linenos, language, style, \
                              highlighted, owner_id, created FROM snippets";

const SELECT_PAYLOAD: &str = "SELECT s.id, s.title, s.code, s.linenos, s.language, \
                              s.style, u.username AS owner, s.created \
                              FROM snippets s JOIN users u ON u.id = s.owner_id";

pub struct NewSnippet<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub linenos: bool,
    pub language: &'a str,
    pub style: &'a str,
    pub highlighted: &'a str,
    pub owner_id: i64,
    pub created: &'a str,
}

pub async fn create(pool: &DbPool, new: &NewSnippet<'_>) -> Result<i64, AppError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO snippets (title, code, linenos, language, style, highlighted, owner_id, created) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(new.title)
    .bind(new.code)
    .bind(new.linenos)
    .bind(new.language)
    .bind(new.style)
    .bind(new.highlighted)
    .bind(new.owner_id)
    .bind(new.created)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn update(
    pool: &DbPool,
    id: i64,
    title: &str,
    code: &str,
    linenos: bool,
    language: &str,
    style: &str,
    highlighted: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE snippets SET title = $1, code = $2, linenos = $3, language = $4, \
         style = $5, highlighted = $6 WHERE id = $7",
    )
    .bind(title)
    .bind(code)
    .bind(linenos)
    .bind(language)
    .bind(style)
    .bind(highlighted)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Snippet>, AppError> {
    let snippet = sqlx::query_as::<_, Snippet>(&format!("{SELECT_SNIPPET} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(snippet)
}

pub async fn find_payload_by_id(pool: &DbPool, id: i64) -> Result<Option<SnippetPayload>, AppError> {
    let payload = sqlx::query_as::<_, SnippetPayload>(&format!("{SELECT_PAYLOAD} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(payload)
}

pub async fn list_payloads(pool: &DbPool) -> Result<Vec<SnippetPayload>, AppError> {
    let payloads = sqlx::query_as::<_, SnippetPayload>(&format!("{SELECT_PAYLOAD} ORDER BY s.id"))
        .fetch_all(pool)
        .await?;
    Ok(payloads)
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM snippets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Ids of all snippets owned by a user, oldest first.
pub async fn ids_by_owner(pool: &DbPool, owner_id: i64) -> Result<Vec<i64>, AppError> {
    let ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM snippets WHERE owner_id = $1 ORDER BY id")
            .bind(owner_id)
            .fetch_all(pool)
            .await?;
    Ok(ids)
}
