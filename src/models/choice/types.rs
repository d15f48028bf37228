use serde::Serialize;

use crate::models::vote::VotePayload;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub choice_text: String,
    pub poll_id: i64,
}

/// Choice as serialized by the API, votes nested. The `poll` field is the
/// owning poll id and never changes after creation.
#[derive(Debug, Clone, Serialize)]
pub struct ChoicePayload {
    pub id: i64,
    pub choice_text: String,
    pub poll: i64,
    pub votes: Vec<VotePayload>,
}

impl ChoicePayload {
    pub fn new(choice: Choice, votes: Vec<VotePayload>) -> Self {
        ChoicePayload {
            id: choice.id,
            choice_text: choice.choice_text,
            poll: choice.poll_id,
            votes,
        }
    }
}
