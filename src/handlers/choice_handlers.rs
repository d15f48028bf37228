use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::{identity, permissions, validate};
use crate::db::DbPool;
use crate::errors::{AppError, ErrorReport};
use crate::models::{choice, poll};

const CHOICE_TEXT_MAX_LEN: usize = 200;

#[derive(Deserialize)]
pub struct ChoiceForm {
    pub choice_text: String,
}

/// Resolve the poll named in the path. A missing poll is a validation error
/// on this nested route, not a 404.
async fn resolve_poll(pool: &DbPool, poll_id: i64) -> Result<poll::Poll, AppError> {
    poll::find_by_id(pool, poll_id).await?.ok_or_else(|| {
        AppError::Validation(ErrorReport::non_field(format!(
            "Poll {poll_id} does not exists"
        )))
    })
}

fn validate_form(form: &ChoiceForm) -> Result<(), AppError> {
    if let Some(msg) = validate::validate_required(&form.choice_text, CHOICE_TEXT_MAX_LEN) {
        return Err(AppError::Validation(ErrorReport::field("choice_text", msg)));
    }
    Ok(())
}

/// GET /api-polls/poll/{pk}/choice/ - Choices of one poll, votes nested.
pub async fn list(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let poll = resolve_poll(&pool, path.into_inner()).await?;
    let payloads = choice::find_payloads_by_poll(&pool, poll.id).await?;
    Ok(HttpResponse::Ok().json(payloads))
}

/// POST /api-polls/poll/{pk}/choice/ - Add a choice. Only the poll's creator
/// may extend it; staff get no exception here.
pub async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<ChoiceForm>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;
    let poll = resolve_poll(&pool, path.into_inner()).await?;

    if poll.created_by != user.id {
        return Err(AppError::PermissionDenied(
            "You can not create choice for this poll".to_string(),
        ));
    }

    validate_form(&body)?;
    let id = choice::create(&pool, poll.id, body.choice_text.trim()).await?;

    let payload = choice::find_payload_in_poll(&pool, poll.id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(payload))
}

/// GET /api-polls/poll/{pk}/choice/{choice_pk}/ - A choice of another poll
/// is absent within this scope.
pub async fn retrieve(
    pool: web::Data<DbPool>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (poll_id, choice_id) = path.into_inner();
    let poll = resolve_poll(&pool, poll_id).await?;

    let payload = choice::find_payload_in_poll(&pool, poll.id, choice_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(payload))
}

/// PUT /api-polls/poll/{pk}/choice/{choice_pk}/ - Owner or staff only.
pub async fn update(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<(i64, i64)>,
    body: web::Json<ChoiceForm>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;

    let (poll_id, choice_id) = path.into_inner();
    let poll = resolve_poll(&pool, poll_id).await?;
    let existing = choice::find_in_poll(&pool, poll.id, choice_id)
        .await?
        .ok_or(AppError::NotFound)?;
    permissions::require_owner_or_staff(&user, poll.created_by)?;

    validate_form(&body)?;
    choice::update_text(&pool, existing.id, body.choice_text.trim()).await?;

    let payload = choice::find_payload_in_poll(&pool, poll.id, existing.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(payload))
}

/// DELETE /api-polls/poll/{pk}/choice/{choice_pk}/ - Owner or staff only.
pub async fn destroy(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;

    let (poll_id, choice_id) = path.into_inner();
    let poll = resolve_poll(&pool, poll_id).await?;
    let existing = choice::find_in_poll(&pool, poll.id, choice_id)
        .await?
        .ok_or(AppError::NotFound)?;
    permissions::require_owner_or_staff(&user, poll.created_by)?;

    choice::delete(&pool, existing.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
