use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::offer_service::OfferService;
use application::post_service::PostService;
use data::repositories::postgres::offer_repository::PostgresOfferRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.db_max_connections).await?;
    run_migrations(&pool).await?;

    let post_repo = PostgresPostRepository::new(pool.clone());
    let offer_repo = PostgresOfferRepository::new(pool);

    let state = AppState::new(
        Arc::new(PostService::new(post_repo.clone())),
        Arc::new(OfferService::new(offer_repo, post_repo)),
        Arc::new(JwtService::new(
            &settings.jwt_secret,
            settings.jwt_audience.clone(),
            settings.jwt_issuer.clone(),
        )),
    );

    server::run_http(&settings, state).await
}
