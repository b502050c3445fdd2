use crate::application::user_service::UserService;
use crate::data::user_repository::SqliteUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginRequest, LoginResponse};
use crate::presentation::utils::{read_json_body, request_id};
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::info;

#[post("/login")]
async fn login(
    req: HttpRequest,
    service: web::Data<UserService<SqliteUserRepository>>,
    body: Result<Bytes, actix_web::Error>,
) -> Result<HttpResponse, DomainError> {
    let payload: LoginRequest = read_json_body(body)?;
    let outcome = service
        .login(payload.email.as_deref(), payload.password.as_deref())
        .await
        .inspect_err(|err| {
            if matches!(err, DomainError::LoginFailed) {
                info!(request_id = %request_id(&req), "login rejected");
            }
        })?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        status: "success",
        user_id: outcome.user_id,
    }))
}
