#![allow(dead_code)]

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use sqlx::SqlitePool;
use user_server::application::user_service::UserService;
use user_server::data::user_repository::SqliteUserRepository;
use user_server::domain::validation::UserPayload;
use user_server::infrastructure::database::{create_memory_pool, run_migrations};
use user_server::presentation::handlers;
use user_server::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};

pub type TestService = UserService<SqliteUserRepository>;

pub async fn test_pool() -> SqlitePool {
    let pool = create_memory_pool().await.expect("in-memory pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

pub async fn test_service() -> TestService {
    let pool = test_pool().await;
    UserService::new(Arc::new(SqliteUserRepository::new(pool)))
}

pub fn test_app(
    service: TestService,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .app_data(web::Data::new(service))
        .configure(handlers::configure)
}

pub struct SampleUser {
    pub id: i64,
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

const SAMPLE_USERS: [(&str, &str, &str); 3] = [
    ("John Doe", "john@example.com", "password123"),
    ("Jane Smith", "jane@example.com", "secret456"),
    ("Bob Johnson", "bob@example.com", "qwerty789"),
];

pub async fn seed_sample_users(service: &TestService) -> Vec<SampleUser> {
    let mut seeded = Vec::with_capacity(SAMPLE_USERS.len());
    for (name, email, password) in SAMPLE_USERS {
        let profile = service
            .create_user(UserPayload {
                name: Some(name),
                email: Some(email),
                password: Some(password),
            })
            .await
            .expect("seed user");
        seeded.push(SampleUser {
            id: profile.id,
            name,
            email,
            password,
        });
    }
    seeded
}
