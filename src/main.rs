use anyhow::Result;
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use std::sync::Arc;
use warp::Filter;

use room_metrics_api::config::AppConfig;
use room_metrics_api::routes;
use room_metrics_api::services::db::DbStore;
use room_metrics_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr();
    info!("Will bind to: {}", addr);

    info!("Connecting to database...");
    let store = DbStore::new(&config.database_url, config.max_connections).await?;
    info!("Database connected");

    let state = AppState::new(Arc::new(store));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
