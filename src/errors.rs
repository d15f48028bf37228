use std::collections::BTreeMap;
use std::fmt;

use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Field-keyed validation errors, serialized as
/// `{"<field>": ["msg", ...], ...}`. Cross-field messages go under
/// `non_field_errors`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorReport(BTreeMap<String, Vec<String>>);

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

impl ErrorReport {
    pub fn non_field(msg: impl Into<String>) -> Self {
        let mut report = ErrorReport::default();
        report.push(NON_FIELD_ERRORS, msg);
        report
    }

    pub fn field(name: &str, msg: impl Into<String>) -> Self {
        let mut report = ErrorReport::default();
        report.push(name, msg);
        report
    }

    pub fn push(&mut self, field: &str, msg: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msgs)| format!("{}: {}", field, msgs.join("; ")))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Hash(String),
    NotFound,
    Unauthorized(String),
    PermissionDenied(String),
    Validation(ErrorReport),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {msg}"),
            AppError::Validation(report) => write!(f, "Validation failed: {report}"),
        }
    }
}

#[derive(Serialize)]
struct Detail<'a> {
    detail: &'a str,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => {
                HttpResponse::NotFound().json(Detail { detail: "Not found." })
            }
            AppError::Unauthorized(msg) => {
                HttpResponse::Unauthorized().json(Detail { detail: msg })
            }
            AppError::PermissionDenied(msg) => {
                HttpResponse::Forbidden().json(Detail { detail: msg })
            }
            AppError::Validation(report) => HttpResponse::BadRequest().json(report),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(Detail { detail: "Internal Server Error" })
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}
