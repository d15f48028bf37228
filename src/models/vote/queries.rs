use crate::db::DbPool;
use crate::errors::AppError;
use super::types::Vote;

const SELECT_VOTE: &str = "SELECT id, poll_id, choice_id, voted_by FROM votes";

/// Insert a vote row. Returns the raw sqlx error so the admission check can
/// map a unique violation on (poll_id, voted_by) to a duplicate-vote denial.
pub async fn insert(
    pool: &DbPool,
    poll_id: i64,
    choice_id: i64,
    voted_by: i64,
) -> Result<Vote, sqlx::Error> {
    sqlx::query_as::<_, Vote>(
        "INSERT INTO votes (poll_id, choice_id, voted_by) VALUES ($1, $2, $3) \
         RETURNING id, poll_id, choice_id, voted_by",
    )
    .bind(poll_id)
    .bind(choice_id)
    .bind(voted_by)
    .fetch_one(pool)
    .await
}

/// Has this user already voted on this poll?
pub async fn exists_for(pool: &DbPool, poll_id: i64, voted_by: i64) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM votes WHERE poll_id = $1 AND voted_by = $2)",
    )
    .bind(poll_id)
    .bind(voted_by)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn find_by_poll(pool: &DbPool, poll_id: i64) -> Result<Vec<Vote>, AppError> {
    let votes = sqlx::query_as::<_, Vote>(&format!(
        "{SELECT_VOTE} WHERE poll_id = $1 ORDER BY id"
    ))
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(votes)
}

pub async fn find_by_choice(pool: &DbPool, choice_id: i64) -> Result<Vec<Vote>, AppError> {
    let votes = sqlx::query_as::<_, Vote>(&format!(
        "{SELECT_VOTE} WHERE choice_id = $1 ORDER BY id"
    ))
    .bind(choice_id)
    .fetch_all(pool)
    .await?;
    Ok(votes)
}

pub async fn find_all(pool: &DbPool) -> Result<Vec<Vote>, AppError> {
    let votes = sqlx::query_as::<_, Vote>(&format!("{SELECT_VOTE} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(votes)
}

pub async fn count(pool: &DbPool) -> Result<i64, AppError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
