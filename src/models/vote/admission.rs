//! Gate for vote creation.
//!
//! Path identifiers arrive raw and untrusted; the caller's identity may be
//! anonymous. `admit` runs the checks in order, short-circuiting on
//! identifier problems and aggregating the identity and duplicate checks
//! into one report, then inserts exactly one vote row. The unique index on
//! `votes(poll_id, voted_by)` backstops the duplicate check against
//! concurrent requests, so there is no partial write on any failure path.

use crate::db::{self, DbPool};
use crate::errors::{AppError, ErrorReport};
use crate::models::choice;
use super::queries;
use super::types::Vote;

#[derive(Debug)]
pub enum AdmissionError {
    /// The raw identifier could not be coerced to a key. `received` is the
    /// shape of the rejected value ("bool" or "str").
    Malformed { received: &'static str },
    ChoiceNotFound { pk: String },
    ChoiceNotInPoll,
    /// Identity and duplicate checks, collected together when both apply.
    Rejected { unauthenticated: bool, duplicate: bool },
    Db(sqlx::Error),
}

impl From<sqlx::Error> for AdmissionError {
    fn from(e: sqlx::Error) -> Self {
        AdmissionError::Db(e)
    }
}

impl From<AppError> for AdmissionError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Db(e) => AdmissionError::Db(e),
            // Model queries below only fail through the database.
            other => AdmissionError::Db(sqlx::Error::Protocol(other.to_string())),
        }
    }
}

impl From<AdmissionError> for AppError {
    fn from(e: AdmissionError) -> Self {
        match e {
            AdmissionError::Malformed { received } => {
                AppError::Validation(ErrorReport::non_field(format!(
                    "Incorrect type. Expected pk value, received {received}."
                )))
            }
            AdmissionError::ChoiceNotFound { pk } => {
                AppError::Validation(ErrorReport::non_field(format!(
                    "Invalid pk \"{pk}\" - object does not exist."
                )))
            }
            AdmissionError::ChoiceNotInPoll => AppError::Validation(ErrorReport::non_field(
                "The choice is not appropriate for a poll's question",
            )),
            AdmissionError::Rejected {
                unauthenticated,
                duplicate,
            } => {
                let mut report = ErrorReport::default();
                if unauthenticated {
                    report.push("user", "Allowed only authenticated users");
                }
                if duplicate {
                    report.push(
                        crate::errors::NON_FIELD_ERRORS,
                        "You are voted on this poll",
                    );
                }
                AppError::Validation(report)
            }
            AdmissionError::Db(e) => AppError::Db(e),
        }
    }
}

/// Coerce a raw path segment to a primary key. Boolean-shaped values are
/// rejected outright; a lax numeric coercion would admit them and vote
/// against whatever row happens to have pk 0 or 1.
fn coerce_pk(raw: &str) -> Result<i64, &'static str> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        return Err("bool");
    }
    trimmed.parse::<i64>().map_err(|_| "str")
}

/// Decide whether a vote may be created and, if so, create it.
///
/// Check order:
/// 1. resolve the choice from its raw id,
/// 2. the choice must belong to the poll named in the path (mismatch wins
///    over poll existence: a dangling poll id reports `ChoiceNotInPoll`),
/// 3. the requester must be authenticated,
/// 4. the requester must not have voted on this poll yet.
///
/// 3 and 4 are independent and reported together; 1 and 2 short-circuit.
pub async fn admit(
    pool: &DbPool,
    poll_pk: &str,
    choice_pk: &str,
    voter: Option<i64>,
) -> Result<Vote, AdmissionError> {
    let choice_id =
        coerce_pk(choice_pk).map_err(|received| AdmissionError::Malformed { received })?;
    let choice = choice::find_by_id(pool, choice_id)
        .await?
        .ok_or_else(|| AdmissionError::ChoiceNotFound {
            pk: choice_pk.trim().to_string(),
        })?;

    let poll_id = coerce_pk(poll_pk).map_err(|received| AdmissionError::Malformed { received })?;
    if poll_id != choice.poll_id {
        return Err(AdmissionError::ChoiceNotInPoll);
    }

    let unauthenticated = voter.is_none();
    let mut duplicate = false;
    if let Some(user_id) = voter {
        duplicate = queries::exists_for(pool, choice.poll_id, user_id).await?;
    }
    let voter_id = match voter {
        Some(id) if !duplicate => id,
        _ => {
            return Err(AdmissionError::Rejected {
                unauthenticated,
                duplicate,
            });
        }
    };

    match queries::insert(pool, choice.poll_id, choice.id, voter_id).await {
        Ok(vote) => Ok(vote),
        // Lost a race against another request for the same (poll, voter);
        // the unique index kept the count at one.
        Err(e) if db::is_unique_violation(&e) => Err(AdmissionError::Rejected {
            unauthenticated: false,
            duplicate: true,
        }),
        Err(e) => Err(AdmissionError::Db(e)),
    }
}
