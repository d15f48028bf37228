use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::{identity, permissions, validate};
use crate::db::DbPool;
use crate::errors::{AppError, ErrorReport};
use crate::models::poll;

const QUESTION_MAX_LEN: usize = 200;

#[derive(Deserialize)]
pub struct PollForm {
    pub question: String,
}

fn validate_form(form: &PollForm) -> Result<(), AppError> {
    if let Some(msg) = validate::validate_required(&form.question, QUESTION_MAX_LEN) {
        return Err(AppError::Validation(ErrorReport::field("question", msg)));
    }
    Ok(())
}

/// GET /api-polls/poll/ - List all polls with nested choices and votes.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let payloads = poll::list_payloads(&pool).await?;
    Ok(HttpResponse::Ok().json(payloads))
}

/// POST /api-polls/poll/ - Create a poll owned by the requester.
pub async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<PollForm>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;
    validate_form(&body)?;

    let pub_date = super::utc_now();
    let id = poll::create(&pool, body.question.trim(), &pub_date, user.id).await?;

    let payload = poll::find_payload_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(payload))
}

/// GET /api-polls/poll/{pk}/ - Single poll with nested choices and votes.
pub async fn retrieve(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let payload = poll::find_payload_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(payload))
}

/// PUT /api-polls/poll/{pk}/ - Update the question. Owner or staff only;
/// `created_by` is immutable.
pub async fn update(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<PollForm>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;

    let poll_id = path.into_inner();
    let existing = poll::find_by_id(&pool, poll_id)
        .await?
        .ok_or(AppError::NotFound)?;
    permissions::require_owner_or_staff(&user, existing.created_by)?;

    validate_form(&body)?;
    poll::update_question(&pool, poll_id, body.question.trim()).await?;

    let payload = poll::find_payload_by_id(&pool, poll_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(payload))
}

/// DELETE /api-polls/poll/{pk}/ - Owner or staff only.
pub async fn destroy(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;

    let poll_id = path.into_inner();
    let existing = poll::find_by_id(&pool, poll_id)
        .await?
        .ok_or(AppError::NotFound)?;
    permissions::require_owner_or_staff(&user, existing.created_by)?;

    poll::delete(&pool, poll_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
