pub mod auth;
pub mod users;

use actix_web::web;

use crate::domain::error::DomainError;
use crate::presentation::utils::{path_config, payload_config, query_config};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(path_config())
        .app_data(payload_config())
        .app_data(query_config())
        .route("/health", web::get().to(crate::utils::health))
        .service(users::home)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::search_users)
        .service(auth::login)
        .default_service(web::to(not_found));
}

async fn not_found() -> Result<actix_web::HttpResponse, DomainError> {
    Err(DomainError::RouteNotFound)
}
