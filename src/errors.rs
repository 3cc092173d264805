use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::forms::FormErrors;

#[derive(Debug)]
pub(crate) enum AppError {
    Validation(String),
    Form(FormErrors),
    Database(String),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Form(errors) => write!(f, "invalid form submission: {errors}"),
            Self::Database(msg) => write!(f, "database error: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Validation(msg) => HttpResponse::BadRequest().json(ErrorBody {
                code: 400,
                message: msg,
                errors: None,
            }),
            Self::Form(errors) => HttpResponse::BadRequest().json(ErrorBody {
                code: 400,
                message: "invalid form submission",
                errors: Some(errors),
            }),
            Self::Database(msg) => {
                log::error!("Database error: {msg}");
                HttpResponse::InternalServerError().json(ErrorBody {
                    code: 500,
                    message: "database connection error",
                    errors: None,
                })
            }
            Self::NotFound(msg) => HttpResponse::NotFound().json(ErrorBody {
                code: 404,
                message: msg,
                errors: None,
            }),
        }
    }
}

impl From<FormErrors> for AppError {
    fn from(errors: FormErrors) -> Self {
        Self::Form(errors)
    }
}

impl From<tokio_postgres::Error> for AppError {
    fn from(err: tokio_postgres::Error) -> Self {
        let msg = if let Some(db_err) = err.as_db_error() {
            format!(
                "{}: {} (code: {})",
                db_err.severity(),
                db_err.message(),
                db_err.code().code()
            )
        } else {
            err.to_string()
        };
        Self::Database(msg)
    }
}

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FormErrors>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn form_errors_render_per_field() {
        let mut errors = FormErrors::default();
        errors.add("time_start", "Enter a valid date.");
        let resp = AppError::Form(errors).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 400);
        assert_eq!(json["errors"]["time_start"][0], "Enter a valid date.");
    }

    #[actix_web::test]
    async fn database_errors_hide_details() {
        let resp = AppError::Database("relation \"area\" does not exist".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "database connection error");
        assert!(json.get("errors").is_none());
    }
}
