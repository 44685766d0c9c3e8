use std::sync::Arc;

use anyhow::Result;
use daytrip::{DaytripConfig, TripPlanner, build_http_client, web};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = DaytripConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    tracing::info!(
        version = daytrip::VERSION,
        city = %config.planner.city,
        "starting daytrip"
    );

    let http = build_http_client(&config.amap)?;
    let planner = Arc::new(TripPlanner::new(&config, http));
    web::run(planner, config.server.port).await
}
