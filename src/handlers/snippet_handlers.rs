use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::{identity, permissions, validate};
use crate::db::DbPool;
use crate::errors::{AppError, ErrorReport};
use crate::highlight;
use crate::models::snippet::{
    self, DEFAULT_LANGUAGE, DEFAULT_STYLE, LANGUAGE_CHOICES, NewSnippet, STYLE_CHOICES,
    SnippetInput,
};

const TITLE_MAX_LEN: usize = 100;

/// Validated snippet fields with defaults applied.
struct Validated<'a> {
    title: &'a str,
    code: &'a str,
    linenos: bool,
    language: &'a str,
    style: &'a str,
}

fn validate_input(input: &SnippetInput) -> Result<Validated<'_>, AppError> {
    let mut report = ErrorReport::default();

    if let Some(msg) = validate::validate_optional(&input.title, TITLE_MAX_LEN) {
        report.push("title", msg);
    }
    if input.code.is_empty() {
        report.push("code", "This field may not be blank.");
    }

    let language = input.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    if let Some(msg) = validate::validate_choice(language, LANGUAGE_CHOICES) {
        report.push("language", msg);
    }
    let style = input.style.as_deref().unwrap_or(DEFAULT_STYLE);
    if let Some(msg) = validate::validate_choice(style, STYLE_CHOICES) {
        report.push("style", msg);
    }

    if !report.is_empty() {
        return Err(AppError::Validation(report));
    }
    Ok(Validated {
        title: &input.title,
        code: &input.code,
        linenos: input.linenos,
        language,
        style,
    })
}

/// GET /api-snippets/snippets/ - Public listing.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let payloads = snippet::list_payloads(&pool).await?;
    Ok(HttpResponse::Ok().json(payloads))
}

/// POST /api-snippets/snippets/ - Create a snippet owned by the requester.
/// The highlighted document is rendered here, once, and stored.
pub async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<SnippetInput>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;
    let valid = validate_input(&body)?;

    let highlighted = highlight::render(valid.code, valid.language, valid.style, valid.linenos);
    let created = super::utc_now();
    let id = snippet::create(
        &pool,
        &NewSnippet {
            title: valid.title,
            code: valid.code,
            linenos: valid.linenos,
            language: valid.language,
            style: valid.style,
            highlighted: &highlighted,
            owner_id: user.id,
            created: &created,
        },
    )
    .await?;

    let payload = snippet::find_payload_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(payload))
}

/// GET /api-snippets/snippets/{pk}/ - Public detail.
pub async fn retrieve(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let payload = snippet::find_payload_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(payload))
}

/// PUT /api-snippets/snippets/{pk}/ - Owner only; re-renders the highlight.
pub async fn update(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<SnippetInput>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;

    let snippet_id = path.into_inner();
    let existing = snippet::find_by_id(&pool, snippet_id)
        .await?
        .ok_or(AppError::NotFound)?;
    permissions::require_owner(&user, existing.owner_id)?;

    let valid = validate_input(&body)?;
    let highlighted = highlight::render(valid.code, valid.language, valid.style, valid.linenos);
    snippet::update(
        &pool,
        snippet_id,
        valid.title,
        valid.code,
        valid.linenos,
        valid.language,
        valid.style,
        &highlighted,
    )
    .await?;

    let payload = snippet::find_payload_by_id(&pool, snippet_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(payload))
}

/// DELETE /api-snippets/snippets/{pk}/ - Owner only.
pub async fn destroy(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = identity::require(identity::authenticate(&req, &session, &pool).await?)?;

    let snippet_id = path.into_inner();
    let existing = snippet::find_by_id(&pool, snippet_id)
        .await?
        .ok_or(AppError::NotFound)?;
    permissions::require_owner(&user, existing.owner_id)?;

    snippet::delete(&pool, snippet_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api-snippets/snippets/{pk}/highlight/ - The stored HTML document.
pub async fn highlighted(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let existing = snippet::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(existing.highlighted))
}
