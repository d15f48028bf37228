use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::identity;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::vote::{self, VotePayload};

/// POST /api-polls/poll/{pk}/choice/{choice_pk}/vote/ - Cast a vote.
///
/// The path identifiers are taken raw; the admission check owns their
/// coercion and every denial message. Anonymous callers are turned away
/// with 401 before admission runs.
pub async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;

    let (poll_pk, choice_pk) = path.into_inner();
    let vote = vote::admit(&pool, &poll_pk, &choice_pk, Some(user.id))
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(VotePayload::from(vote)))
}
