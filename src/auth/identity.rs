use actix_session::Session;
use actix_web::HttpRequest;

use crate::auth::{session, token};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;

/// The authenticated principal attached to a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
}

/// Resolve the requester from an `Authorization: Token <key>` header or,
/// failing that, from the session cookie. Returns `None` for anonymous.
///
/// A header with the `Token` keyword but a bad key is a hard 401 rather than
/// a fall-through to anonymous, so a client with a stale token hears about it.
pub async fn authenticate(
    req: &HttpRequest,
    session: &Session,
    pool: &DbPool,
) -> Result<Option<CurrentUser>, AppError> {
    if let Some(value) = req.headers().get("authorization") {
        let value = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid token header.".to_string()))?;

        let mut parts = value.split_whitespace();
        if parts.next().is_some_and(|kw| kw.eq_ignore_ascii_case("token")) {
            let key = parts.next().ok_or_else(|| {
                AppError::Unauthorized(
                    "Invalid token header. No credentials provided.".to_string(),
                )
            })?;
            if parts.next().is_some() {
                return Err(AppError::Unauthorized(
                    "Invalid token header. Token string should not contain spaces.".to_string(),
                ));
            }

            let user_id = token::find_user_id_by_key(pool, key)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid token.".to_string()))?;
            let found = user::find_by_id(pool, user_id).await?;
            return match found {
                Some(u) => Ok(Some(current(u))),
                None => Err(AppError::Unauthorized("Invalid token.".to_string())),
            };
        }
        // Unknown scheme: not ours to reject, fall through to the session.
    }

    if let Some(user_id) = session::get_user_id(session) {
        if let Some(u) = user::find_by_id(pool, user_id).await? {
            return Ok(Some(current(u)));
        }
        // Session references a deleted user; drop it.
        session.purge();
    }

    Ok(None)
}

/// Unwrap an identity, turning anonymous into 401.
pub fn require(user: Option<CurrentUser>) -> Result<CurrentUser, AppError> {
    user.ok_or_else(|| {
        AppError::Unauthorized("Authentication credentials were not provided.".to_string())
    })
}

fn current(u: user::User) -> CurrentUser {
    CurrentUser {
        id: u.id,
        username: u.username,
        is_staff: u.is_staff,
    }
}
