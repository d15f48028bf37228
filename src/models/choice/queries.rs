use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::vote;
use super::types::{Choice, ChoicePayload};

const SELECT_CHOICE: &str = "SELECT id, choice_text, poll_id FROM choices";

pub async fn create(pool: &DbPool, poll_id: i64, choice_text: &str) -> Result<i64, AppError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO choices (choice_text, poll_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(choice_text)
    .bind(poll_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Choice>, AppError> {
    let choice = sqlx::query_as::<_, Choice>(&format!("{SELECT_CHOICE} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(choice)
}

/// Find a choice scoped to a poll; a choice of a different poll is absent here.
pub async fn find_in_poll(
    pool: &DbPool,
    poll_id: i64,
    choice_id: i64,
) -> Result<Option<Choice>, AppError> {
    let choice = sqlx::query_as::<_, Choice>(&format!(
        "{SELECT_CHOICE} WHERE id = $1 AND poll_id = $2"
    ))
    .bind(choice_id)
    .bind(poll_id)
    .fetch_optional(pool)
    .await?;
    Ok(choice)
}

pub async fn find_by_poll(pool: &DbPool, poll_id: i64) -> Result<Vec<Choice>, AppError> {
    let choices = sqlx::query_as::<_, Choice>(&format!(
        "{SELECT_CHOICE} WHERE poll_id = $1 ORDER BY id"
    ))
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(choices)
}

pub async fn find_all(pool: &DbPool) -> Result<Vec<Choice>, AppError> {
    let choices = sqlx::query_as::<_, Choice>(&format!("{SELECT_CHOICE} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(choices)
}

pub async fn update_text(pool: &DbPool, id: i64, choice_text: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE choices SET choice_text = $1 WHERE id = $2")
        .bind(choice_text)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM choices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// All choices of a poll with their votes nested, for the scoped list endpoint.
pub async fn find_payloads_by_poll(
    pool: &DbPool,
    poll_id: i64,
) -> Result<Vec<ChoicePayload>, AppError> {
    let choices = find_by_poll(pool, poll_id).await?;
    let votes = vote::find_by_poll(pool, poll_id).await?;

    let mut votes_by_choice: std::collections::HashMap<i64, Vec<_>> =
        std::collections::HashMap::new();
    for v in votes {
        votes_by_choice.entry(v.choice_id).or_default().push(v.into());
    }

    Ok(choices
        .into_iter()
        .map(|c| {
            let votes = votes_by_choice.remove(&c.id).unwrap_or_default();
            ChoicePayload::new(c, votes)
        })
        .collect())
}

/// Choice with its votes nested, for the scoped detail endpoint.
pub async fn find_payload_in_poll(
    pool: &DbPool,
    poll_id: i64,
    choice_id: i64,
) -> Result<Option<ChoicePayload>, AppError> {
    let Some(choice) = find_in_poll(pool, poll_id, choice_id).await? else {
        return Ok(None);
    };
    let votes = vote::find_by_choice(pool, choice.id).await?;
    Ok(Some(ChoicePayload::new(
        choice,
        votes.into_iter().map(Into::into).collect(),
    )))
}
