pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod ride;
pub mod stamp;

use axum::{routing::get, Router};
use config::GateConfig;
use fare_adapter::{HttpPredictionClient, PredictionClient};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub predictor: Arc<dyn PredictionClient>,
}

impl AppState {
    pub fn new(config: GateConfig, predictor: Arc<dyn PredictionClient>) -> Self {
        Self {
            config: Arc::new(config),
            predictor,
        }
    }

    /// Production wiring: an HTTP client against the configured endpoint.
    pub fn from_config(config: GateConfig) -> Self {
        let client = HttpPredictionClient::new(config.endpoint.clone())
            .with_token(config.access_token.clone())
            .with_timeout_ms(config.upstream_timeout_ms);
        info!("prediction endpoint {}", client.endpoint());
        Self::new(config, Arc::new(client))
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/predict_fare", get(api::predict_fare))
        .with_state(state)
}

pub mod test {
    use super::AppState;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Spawn the server on a random port. Returns the address and a
    /// JoinHandle that keeps the server alive until dropped.
    pub async fn spawn(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let app = super::app(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, handle)
    }
}
