use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{snippet, user};
use crate::models::user::UserPayload;

/// GET /api-snippets/users/ - Read-only listing with owned snippet ids.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let users = user::find_all(&pool).await?;

    let mut payloads = Vec::with_capacity(users.len());
    for u in users {
        let snippets = snippet::ids_by_owner(&pool, u.id).await?;
        payloads.push(UserPayload {
            id: u.id,
            username: u.username,
            snippets,
        });
    }
    Ok(HttpResponse::Ok().json(payloads))
}

/// GET /api-snippets/users/{pk}/ - Read-only detail.
pub async fn retrieve(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let u = user::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    let snippets = snippet::ids_by_owner(&pool, u.id).await?;
    Ok(HttpResponse::Ok().json(UserPayload {
        id: u.id,
        username: u.username,
        snippets,
    }))
}
