use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::auth::{password, rate_limit::RateLimiter, session, token, validate};
use crate::db::DbPool;
use crate::errors::{AppError, ErrorReport};
use crate::models::user::{self, NewUser};

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct RegisterResponse<'a> {
    username: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    username: String,
    token: String,
}

/// POST /api-polls/user/ - Register a new user and issue their API token.
/// Open to anonymous callers; the password never appears in responses.
pub async fn register(
    pool: web::Data<DbPool>,
    body: web::Json<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    let mut report = ErrorReport::default();
    if let Some(msg) = validate::validate_username(&body.username) {
        report.push("username", msg);
    }
    if let Some(msg) = validate::validate_password(&body.password) {
        report.push("password", msg);
    }
    if let Some(msg) = validate::validate_email(&body.email) {
        report.push("email", msg);
    }
    if !report.is_empty() {
        return Err(AppError::Validation(report));
    }

    let hashed = password::hash_password(&body.password).map_err(AppError::Hash)?;
    let new_user = NewUser {
        username: body.username.trim().to_string(),
        email: body.email.trim().to_string(),
        password: hashed,
    };
    let user_id = user::create(&pool, &new_user).await?;
    token::ensure(&pool, user_id).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        username: &new_user.username,
        email: &new_user.email,
    }))
}

/// POST /api-polls/login/ - Verify credentials, bind the session, and return
/// the user's persistent token for header authentication.
pub async fn login(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        return Err(AppError::Validation(ErrorReport::non_field(
            "Too many failed login attempts. Please try again later.",
        )));
    }

    let found = user::find_by_username(&pool, &body.username).await?;

    match found {
        Some(u) => match password::verify_password(&body.password, &u.password) {
            Ok(true) => {
                limiter.clear(ip);
                let key = token::ensure(&pool, u.id).await?;
                session::login(&session, &u);
                Ok(HttpResponse::Ok().json(LoginResponse {
                    username: u.username,
                    token: key,
                }))
            }
            _ => {
                limiter.record_failure(ip);
                Err(AppError::Validation(ErrorReport::non_field(
                    "Authentication error",
                )))
            }
        },
        None => {
            limiter.record_failure(ip);
            Err(AppError::Validation(ErrorReport::non_field(
                "Authentication error",
            )))
        }
    }
}

/// POST /api-polls/logout/ - Drop the session. Token keys stay valid.
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session::logout(&session);
    Ok(HttpResponse::NoContent().finish())
}
