use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use routesafe::api::AppState;
use routesafe::{
    GeocoderClient, Pipeline, RiskScorer, RouteSafeConfig, RoutingClient, WeatherClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RouteSafeConfig::load()?;

    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // The classifier is a startup dependency: refuse to serve without it.
    let scorer = RiskScorer::from_file(Path::new(&config.model.artifact_path))
        .context("classifier artifact must be loadable at startup")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.providers.timeout_seconds.into()))
        .user_agent(config.providers.user_agent.clone())
        .build()
        .context("Failed to create HTTP client")?;

    let pipeline = Pipeline::new(
        GeocoderClient::new(client.clone(), config.providers.geocoder_base_url.clone()),
        WeatherClient::new(
            client.clone(),
            config.providers.weather_base_url.clone(),
            config.providers.weather_api_key.clone(),
        ),
        RoutingClient::new(
            client,
            config.providers.routing_base_url.clone(),
            config.providers.routing_api_key.clone(),
        ),
        scorer,
    );

    let state = Arc::new(AppState::new(pipeline));
    routesafe::web::run(state, config.server.port, &config.server.frontend_dir).await
}
