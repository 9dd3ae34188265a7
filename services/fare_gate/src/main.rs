use fare_gate::config::GateConfig;
use tokio::net::TcpListener;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();
    let config = GateConfig::from_env()?;
    if let Some(addr) = config.metrics_addr {
        fare_gate::metrics::install_exporter(addr)?;
        info!("metrics on {addr}");
    }
    let bind_addr = config.bind_addr;
    let model = config.model.clone();
    info!(
        "pickup_datetime zone {} ({}, {}), default location {}",
        config.zone.name, config.zone.offset, config.timestamp_mode, config.defaults.location
    );
    let app = fare_gate::app(fare_gate::AppState::from_config(config));
    let listener = TcpListener::bind(bind_addr).await?;
    info!("listening on {} (model {})", listener.local_addr()?, model);
    axum::serve(listener, app).await?;
    Ok(())
}
