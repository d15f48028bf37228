use serde::Serialize;

use crate::models::choice::ChoicePayload;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Poll {
    pub id: i64,
    pub question: String,
    pub pub_date: String,
    pub created_by: i64,
}

/// Poll as serialized by the API: the row plus its choices, each carrying
/// its votes. `created_by` is immutable after creation.
#[derive(Debug, Clone, Serialize)]
pub struct PollPayload {
    pub id: i64,
    pub question: String,
    pub pub_date: String,
    pub created_by: i64,
    pub choices: Vec<ChoicePayload>,
}
