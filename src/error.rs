use actix_web::{http::header, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::auth::AUTH_REALM;

/// Signals raised by the query layer. Absence of a row is never an error
/// there; the only distinguished failure is a unique-key conflict.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} already exists")]
    Conflict { entity: &'static str },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Maps a sqlx insert failure, turning unique-key violations into a
    /// distinct conflict signal.
    pub fn on_insert(entity: &'static str) -> impl Fn(sqlx::Error) -> DbError {
        move |err| {
            if let sqlx::Error::Database(ref db_err) = err {
                if db_err.is_unique_violation() {
                    return DbError::Conflict { entity };
                }
            }
            DbError::Sqlx(err)
        }
    }
}

/// Boundary-visible error taxonomy. The API layer is the sole translator
/// from internal signals to response codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("Internal server error")]
    Database(#[source] sqlx::Error),

    #[error("Internal server error")]
    Internal(&'static str),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict { entity } => ApiError::Conflict(format!("{entity} already exists")),
            DbError::Sqlx(err) => ApiError::Database(err),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err)
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = match self {
            ApiError::NotFound(_) => HttpResponse::NotFound(),
            ApiError::Conflict(_) | ApiError::Validation(_) => HttpResponse::BadRequest(),
            ApiError::Unauthorized => {
                let mut builder = HttpResponse::Unauthorized();
                builder.insert_header((
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{AUTH_REALM}\""),
                ));
                builder
            }
            ApiError::Forbidden => HttpResponse::Forbidden(),
            ApiError::Database(err) => {
                log::error!("storage failure: {err}");
                HttpResponse::InternalServerError()
            }
            ApiError::Internal(detail) => {
                log::error!("internal failure: {detail}");
                HttpResponse::InternalServerError()
            }
        };
        builder.json(json!({ "detail": self.to_string() }))
    }
}
