use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Vote {
    pub id: i64,
    pub poll_id: i64,
    pub choice_id: i64,
    pub voted_by: i64,
}

/// Vote as serialized by the API. Votes are write-once: no update or delete
/// surface exists, so this is the only shape they ever take on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct VotePayload {
    pub id: i64,
    pub poll: i64,
    pub choice: i64,
    pub voted_by: i64,
}

impl From<Vote> for VotePayload {
    fn from(v: Vote) -> Self {
        VotePayload {
            id: v.id,
            poll: v.poll_id,
            choice: v.choice_id,
            voted_by: v.voted_by,
        }
    }
}
