//! Main entry point for the Image Studio Gateway

use img_studio_gateway::{
    api,
    config::{LoggingConfig, Settings},
    inference::{HttpGateway, ModelRunner},
    AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    init_logging(&settings.logging);

    info!("Starting Image Studio Gateway");
    settings.validate()?;
    info!(
        host = %settings.server.host,
        port = settings.server.port,
        classifier = %settings.gateway.models.classifier,
        text = %settings.gateway.models.text,
        image = %settings.gateway.models.image,
        "Loaded configuration"
    );

    let gateway = Arc::new(HttpGateway::new(&settings.gateway)?);
    let models = ModelRunner::new(gateway, &settings.gateway);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app_state = Arc::new(AppState::new(settings, models));

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
