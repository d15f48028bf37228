use std::collections::HashMap;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::choice::{self, ChoicePayload};
use crate::models::vote::{self, VotePayload};
use super::types::{Poll, PollPayload};

const SELECT_POLL: &str = "SELECT id, question, pub_date, created_by FROM polls";

pub async fn create(
    pool: &DbPool,
    question: &str,
    pub_date: &str,
    created_by: i64,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO polls (question, pub_date, created_by) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(question)
    .bind(pub_date)
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Poll>, AppError> {
    let poll = sqlx::query_as::<_, Poll>(&format!("{SELECT_POLL} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(poll)
}

pub async fn update_question(pool: &DbPool, id: i64, question: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE polls SET question = $1 WHERE id = $2")
        .bind(question)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a poll; choices and votes go with it via FK cascade.
pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM polls WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Single poll with nested choices and votes.
pub async fn find_payload_by_id(pool: &DbPool, id: i64) -> Result<Option<PollPayload>, AppError> {
    let Some(poll) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    let choices = choice::find_by_poll(pool, poll.id).await?;
    let votes = vote::find_by_poll(pool, poll.id).await?;

    let mut votes_by_choice: HashMap<i64, Vec<VotePayload>> = HashMap::new();
    for v in votes {
        votes_by_choice.entry(v.choice_id).or_default().push(v.into());
    }

    let choices = choices
        .into_iter()
        .map(|c| {
            let votes = votes_by_choice.remove(&c.id).unwrap_or_default();
            ChoicePayload::new(c, votes)
        })
        .collect();

    Ok(Some(PollPayload {
        id: poll.id,
        question: poll.question,
        pub_date: poll.pub_date,
        created_by: poll.created_by,
        choices,
    }))
}

/// All polls with nested choices and votes, three queries total.
pub async fn list_payloads(pool: &DbPool) -> Result<Vec<PollPayload>, AppError> {
    let polls = sqlx::query_as::<_, Poll>(&format!("{SELECT_POLL} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    let choices = choice::find_all(pool).await?;
    let votes = vote::find_all(pool).await?;

    let mut votes_by_choice: HashMap<i64, Vec<VotePayload>> = HashMap::new();
    for v in votes {
        votes_by_choice.entry(v.choice_id).or_default().push(v.into());
    }

    let mut choices_by_poll: HashMap<i64, Vec<ChoicePayload>> = HashMap::new();
    for c in choices {
        let votes = votes_by_choice.remove(&c.id).unwrap_or_default();
        choices_by_poll
            .entry(c.poll_id)
            .or_default()
            .push(ChoicePayload::new(c, votes));
    }

    let payloads = polls
        .into_iter()
        .map(|p| {
            let choices = choices_by_poll.remove(&p.id).unwrap_or_default();
            PollPayload {
                id: p.id,
                question: p.question,
                pub_date: p.pub_date,
                created_by: p.created_by,
                choices,
            }
        })
        .collect();
    Ok(payloads)
}
