use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("User not found")]
    UserNotFound(i64),
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("Not found")]
    RouteNotFound,
    #[error("Payload too large")]
    PayloadTooLarge,
    #[error("failed")]
    LoginFailed,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DomainError::InvalidInput(message.into())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::UserNotFound(_) | DomainError::RouteNotFound => StatusCode::NOT_FOUND,
            DomainError::EmailAlreadyExists => StatusCode::CONFLICT,
            DomainError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            DomainError::LoginFailed => StatusCode::UNAUTHORIZED,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            DomainError::LoginFailed => response.json(StatusBody { status: "failed" }),
            DomainError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                response.json(ErrorBody {
                    error: "Internal server error",
                })
            }
            _ => {
                let message = self.to_string();
                response.json(ErrorBody {
                    error: message.as_str(),
                })
            }
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Internal(format!("database error: {}", err))
    }
}
