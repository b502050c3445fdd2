use actix_web::http::StatusCode;
use actix_web::web::{self, Bytes};
use actix_web::{HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;

use crate::domain::error::DomainError;
use crate::presentation::middleware::RequestId;

pub const MAX_BODY_BYTES: usize = 256 * 1024;

// Bodies are read as JSON whatever `Content-Type` the client sent.
pub fn read_json_body<T: DeserializeOwned>(
    body: Result<Bytes, actix_web::Error>,
) -> Result<T, DomainError> {
    let body = body.map_err(|err| {
        if err.as_response_error().status_code() == StatusCode::PAYLOAD_TOO_LARGE {
            DomainError::PayloadTooLarge
        } else {
            DomainError::invalid_input("Invalid JSON body")
        }
    })?;
    serde_json::from_slice(&body).map_err(|_| DomainError::invalid_input("Invalid JSON body"))
}

pub fn payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(MAX_BODY_BYTES)
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_, _| DomainError::RouteNotFound.into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|_, _| DomainError::invalid_input("Invalid query string").into())
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
