use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {0:?}")]
    InvalidFields(BTreeMap<String, String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    /// Turn a unique-constraint violation into `Validation(msg)`, leave other errors untouched.
    pub fn on_duplicate(err: DbErr, msg: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Validation(msg.to_string()),
            _ => AppError::Database(err),
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_))
                | Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    tracing::warn!("Integrity violation: {:?}", e);
                    (
                        StatusCode::CONFLICT,
                        "Request conflicts with existing data".to_string(),
                    )
                }
                _ => {
                    tracing::error!("Database error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error".to_string(),
                    )
                }
            },
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidFields(_) => {
                (StatusCode::BAD_REQUEST, "Invalid request fields".to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None => format!("invalid value ({})", e.code),
                    })
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), message)
            })
            .collect();
        AppError::InvalidFields(fields)
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl utoipa::ToSchema for AppError {
    fn name() -> std::borrow::Cow<'static, str> {
        "ErrorResponse".into()
    }
}

impl utoipa::PartialSchema for AppError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let data = match self {
            AppError::InvalidFields(fields) => json!(fields),
            _ => serde_json::Value::Null,
        };

        let body = json!({
            "success": false,
            "message": message,
            "data": data,
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let cases = [
            (AppError::not_found("Debate"), StatusCode::NOT_FOUND),
            (AppError::validation("bad dates"), StatusCode::BAD_REQUEST),
            (AppError::unauthorized("not owner"), StatusCode::UNAUTHORIZED),
            (AppError::forbidden("suspended"), StatusCode::FORBIDDEN),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let (_, msg) = AppError::not_found("Category").status_and_message();
        assert_eq!(msg, "Category not found");
    }

    #[test]
    fn validation_errors_aggregate_per_field() {
        use validator::Validate;

        #[derive(Validate)]
        struct Input {
            #[validate(length(min = 1, message = "title is required"))]
            title: String,
            #[validate(length(min = 1))]
            content: String,
        }

        let err: AppError = Input {
            title: String::new(),
            content: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();

        match err {
            AppError::InvalidFields(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields["title"], "title is required");
                assert!(fields["content"].contains("length"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
