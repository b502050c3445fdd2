use std::sync::Arc;

use tracing::{error, info};
use user_server::application::user_service::UserService;
use user_server::data::user_repository::SqliteUserRepository;
use user_server::infrastructure::config::AppConfig;
use user_server::infrastructure::database::{create_pool, run_migrations};
use user_server::infrastructure::logging::init_logging;
use user_server::utils::start_rest_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().inspect_err(|e| error!("invalid configuration: {}", e))?;
    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .inspect_err(|e| error!("failed to connect to database: {}", e))?;
    run_migrations(&pool)
        .await
        .inspect_err(|e| error!("failed to run migrations: {}", e))?;

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repo);

    start_rest_server(config, user_service).await?;

    pool.close().await;
    info!("database pool closed");
    Ok(())
}
