// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_builder::ChartBuilder;
use crate::application::command_dispatcher::CommandDispatcher;
use crate::application::config_synchronizer::ConfigSynchronizer;
use crate::application::device_gateway::DeviceGateway;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::timeseries_loader::TimeSeriesLoader;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::device_client::HttpDeviceClient;
use crate::infrastructure::plotly_renderer::PlotlyRenderer;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    change_password, get_chart, get_config, health_check, manual_watering, reboot, save_config,
    stream_dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create device gateway (infrastructure layer)
    let gateway: Arc<dyn DeviceGateway> = Arc::new(HttpDeviceClient::new(
        config.device.base_url.clone(),
        config.device.timeout(),
    )?);

    // Create components (application layer)
    let config_synchronizer = ConfigSynchronizer::new(gateway.clone());
    let dashboard_service = StreamingDashboardService::new(
        TimeSeriesLoader::new(gateway.clone()),
        ChartBuilder::new(config.chart.default_range),
        Arc::new(PlotlyRenderer),
        config_synchronizer.clone(),
    );
    let command_dispatcher = CommandDispatcher::new(gateway);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        config_synchronizer,
        command_dispatcher,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/chart", get(get_chart))
        .route("/config", get(get_config).post(save_config))
        .route("/password", post(change_password))
        .route("/commands/manual-watering", post(manual_watering))
        .route("/commands/reboot", post(reboot))
        .route("/dashboard/stream", get(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!(%addr, device = %config.device.base_url, "Starting irrigation dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
