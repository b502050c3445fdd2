use crate::application::user_service::UserService;
use crate::data::user_repository::SqliteUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{MessageResponse, SearchQuery, UserRequest};
use crate::presentation::utils::{read_json_body, request_id};
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;

type Service = web::Data<UserService<SqliteUserRepository>>;

#[get("/")]
async fn home() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new("User Management System"))
}

#[get("/users")]
async fn list_users(service: Service) -> Result<HttpResponse, DomainError> {
    let users = service.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/user/{id}")]
async fn get_user(service: Service, path: web::Path<i64>) -> Result<HttpResponse, DomainError> {
    let user = service.get_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/users")]
async fn create_user(
    req: HttpRequest,
    service: Service,
    body: Result<Bytes, actix_web::Error>,
) -> Result<HttpResponse, DomainError> {
    let payload: UserRequest = read_json_body(body)?;
    let user = service.create_user(payload.as_payload()).await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        "user created"
    );

    Ok(HttpResponse::Created().json(MessageResponse::new("User created")))
}

#[put("/user/{id}")]
async fn update_user(
    req: HttpRequest,
    service: Service,
    path: web::Path<i64>,
    body: Result<Bytes, actix_web::Error>,
) -> Result<HttpResponse, DomainError> {
    let user_id = path.into_inner();
    let payload: UserRequest = match read_json_body(body) {
        Ok(payload) => payload,
        Err(err) => {
            service.get_user(user_id).await?;
            return Err(err);
        }
    };
    service.update_user(user_id, payload.as_payload()).await?;

    info!(
        request_id = %request_id(&req),
        user_id,
        "user updated"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("User updated")))
}

#[delete("/user/{id}")]
async fn delete_user(
    req: HttpRequest,
    service: Service,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let user_id = path.into_inner();
    service.delete_user(user_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id,
        "user deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted")))
}

#[get("/search")]
async fn search_users(
    service: Service,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, DomainError> {
    let users = service.search_users(&query.name).await?;
    Ok(HttpResponse::Ok().json(users))
}
