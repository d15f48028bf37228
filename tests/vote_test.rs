//! Vote admission tests.
//!
//! Covers the full admission contract: identifier coercion, choice
//! resolution, poll/choice consistency, authentication, the one-vote-per-poll
//! rule, and the unique-index backstop against racing inserts.

mod common;

use common::{PollBuilder, UserBuilder, setup_test_db};
use pollsapi::errors::{AppError, NON_FIELD_ERRORS};
use pollsapi::models::vote::{self, AdmissionError};

fn non_field_message(err: AdmissionError) -> String {
    match AppError::from(err) {
        AppError::Validation(report) => report
            .messages(NON_FIELD_ERRORS)
            .first()
            .cloned()
            .expect("expected a non-field error message"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_admit_creates_exactly_one_vote() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").choice("no").create(pool).await;
    let choice = &fixture.choices[0];

    let vote = vote::admit(
        pool,
        &fixture.poll.id.to_string(),
        &choice.id.to_string(),
        Some(voter.id),
    )
    .await
    .expect("admission should succeed");

    assert_eq!(vote.poll_id, fixture.poll.id);
    assert_eq!(vote.choice_id, choice.id);
    assert_eq!(vote.voted_by, voter.id);
    assert_eq!(vote::count(pool).await.expect("count"), 1);
}

#[tokio::test]
async fn test_second_vote_on_same_poll_is_rejected() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").choice("no").create(pool).await;

    vote::admit(
        pool,
        &fixture.poll.id.to_string(),
        &fixture.choices[0].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect("first vote");

    // Second attempt, even for a different choice of the same poll
    let err = vote::admit(
        pool,
        &fixture.poll.id.to_string(),
        &fixture.choices[1].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect_err("second vote must be rejected");

    match &err {
        AdmissionError::Rejected {
            unauthenticated,
            duplicate,
        } => {
            assert!(!unauthenticated);
            assert!(duplicate);
        }
        other => panic!("expected duplicate rejection, got {other:?}"),
    }
    assert_eq!(non_field_message(err), "You are voted on this poll");
    assert_eq!(vote::count(pool).await.expect("count"), 1);
}

#[tokio::test]
async fn test_different_voters_may_vote_on_same_poll() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let first = UserBuilder::new("first").create(pool).await;
    let second = UserBuilder::new("second").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").create(pool).await;
    let choice_pk = fixture.choices[0].id.to_string();
    let poll_pk = fixture.poll.id.to_string();

    vote::admit(pool, &poll_pk, &choice_pk, Some(first.id))
        .await
        .expect("first voter");
    vote::admit(pool, &poll_pk, &choice_pk, Some(second.id))
        .await
        .expect("second voter");

    assert_eq!(vote::count(pool).await.expect("count"), 2);
}

#[tokio::test]
async fn test_same_voter_may_vote_on_different_polls() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let first = PollBuilder::new(owner.id).choice("a").create(pool).await;
    let second = PollBuilder::new(owner.id).choice("b").create(pool).await;

    vote::admit(
        pool,
        &first.poll.id.to_string(),
        &first.choices[0].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect("vote on first poll");
    vote::admit(
        pool,
        &second.poll.id.to_string(),
        &second.choices[0].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect("vote on second poll");

    assert_eq!(vote::count(pool).await.expect("count"), 2);
}

#[tokio::test]
async fn test_anonymous_voter_is_rejected() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").create(pool).await;

    // Valid poll and choice make no difference for an anonymous caller
    let err = vote::admit(
        pool,
        &fixture.poll.id.to_string(),
        &fixture.choices[0].id.to_string(),
        None,
    )
    .await
    .expect_err("anonymous must be rejected");

    match &err {
        AdmissionError::Rejected {
            unauthenticated,
            duplicate,
        } => {
            assert!(unauthenticated);
            assert!(!duplicate);
        }
        other => panic!("expected unauthenticated rejection, got {other:?}"),
    }

    match AppError::from(err) {
        AppError::Validation(report) => {
            let messages = report.messages("user");
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0], "Allowed only authenticated users");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(vote::count(pool).await.expect("count"), 0);
}

#[tokio::test]
async fn test_unknown_choice_id_is_rejected() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").create(pool).await;

    let err = vote::admit(pool, &fixture.poll.id.to_string(), "0", Some(voter.id))
        .await
        .expect_err("unknown choice must be rejected");

    assert!(matches!(&err, AdmissionError::ChoiceNotFound { pk } if pk == "0"));
    assert_eq!(
        non_field_message(err),
        "Invalid pk \"0\" - object does not exist."
    );
    assert_eq!(vote::count(pool).await.expect("count"), 0);
}

#[tokio::test]
async fn test_unknown_poll_with_valid_choice_reports_mismatch() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").create(pool).await;

    // The poll id is never resolved on its own; the mismatch against the
    // choice's owning poll wins over poll existence.
    let err = vote::admit(
        pool,
        "0",
        &fixture.choices[0].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect_err("dangling poll id must be rejected");

    assert!(matches!(err, AdmissionError::ChoiceNotInPoll));
    assert_eq!(
        non_field_message(err),
        "The choice is not appropriate for a poll's question"
    );
    assert_eq!(vote::count(pool).await.expect("count"), 0);
}

#[tokio::test]
async fn test_choice_of_another_poll_is_rejected() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let with_choices = PollBuilder::new(owner.id).choice("yes").create(pool).await;
    let empty = PollBuilder::new(owner.id).question("No choices here?").create(pool).await;

    let err = vote::admit(
        pool,
        &empty.poll.id.to_string(),
        &with_choices.choices[0].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect_err("cross-poll choice must be rejected");

    assert!(matches!(err, AdmissionError::ChoiceNotInPoll));
    assert_eq!(vote::count(pool).await.expect("count"), 0);
}

#[tokio::test]
async fn test_boolean_shaped_identifiers_are_rejected() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").create(pool).await;

    let err = vote::admit(pool, &fixture.poll.id.to_string(), "true", Some(voter.id))
        .await
        .expect_err("boolean choice id must be rejected");
    assert!(matches!(err, AdmissionError::Malformed { received: "bool" }));
    assert_eq!(
        non_field_message(err),
        "Incorrect type. Expected pk value, received bool."
    );

    let err = vote::admit(
        pool,
        "False",
        &fixture.choices[0].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect_err("boolean poll id must be rejected");
    assert!(matches!(err, AdmissionError::Malformed { received: "bool" }));

    assert_eq!(vote::count(pool).await.expect("count"), 0);
}

#[tokio::test]
async fn test_non_numeric_identifiers_are_rejected() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").create(pool).await;

    let err = vote::admit(pool, &fixture.poll.id.to_string(), "abc", Some(voter.id))
        .await
        .expect_err("non-numeric choice id must be rejected");
    assert!(matches!(err, AdmissionError::Malformed { received: "str" }));
    assert_eq!(
        non_field_message(err),
        "Incorrect type. Expected pk value, received str."
    );

    let err = vote::admit(
        pool,
        "not-a-pk",
        &fixture.choices[0].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect_err("non-numeric poll id must be rejected");
    assert!(matches!(err, AdmissionError::Malformed { received: "str" }));
}

#[tokio::test]
async fn test_unique_index_backstops_racing_inserts() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").choice("no").create(pool).await;

    // Bypass the read-then-write check, as a racing request effectively would
    vote::insert(pool, fixture.poll.id, fixture.choices[0].id, voter.id)
        .await
        .expect("first insert");
    let err = vote::insert(pool, fixture.poll.id, fixture.choices[1].id, voter.id)
        .await
        .expect_err("second insert must hit the unique index");
    assert!(pollsapi::db::is_unique_violation(&err));

    // And the admission check reports the race as a duplicate vote
    let err = vote::admit(
        pool,
        &fixture.poll.id.to_string(),
        &fixture.choices[1].id.to_string(),
        Some(voter.id),
    )
    .await
    .expect_err("admission after insert must reject");
    assert_eq!(non_field_message(err), "You are voted on this poll");

    assert_eq!(vote::count(pool).await.expect("count"), 1);
}

#[tokio::test]
async fn test_identifiers_tolerate_surrounding_whitespace() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let owner = UserBuilder::new("owner").create(pool).await;
    let voter = UserBuilder::new("voter").create(pool).await;
    let fixture = PollBuilder::new(owner.id).choice("yes").create(pool).await;

    let vote = vote::admit(
        pool,
        &format!(" {} ", fixture.poll.id),
        &format!(" {} ", fixture.choices[0].id),
        Some(voter.id),
    )
    .await
    .expect("whitespace-padded ids should coerce");
    assert_eq!(vote.poll_id, fixture.poll.id);
}
