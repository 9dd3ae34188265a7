use crate::error::AppError;
use crate::metrics::{record_outcome, record_upstream_latency};
use crate::ride::{RideParams, RideQuery};
use crate::stamp::pickup_stamp;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use fare_adapter::first_prediction;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
pub struct FareResponse {
    pub fare: Value,
    pub params: RideParams,
}

pub async fn index() -> &'static str {
    "OK"
}

/// Query pairs are taken raw so a repeated key keeps its first value
/// instead of failing extraction.
pub async fn predict_fare(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<FareResponse>, AppError> {
    let result = match query {
        Ok(Query(pairs)) => predict_within_deadline(&state, &RideQuery::from_pairs(pairs)).await,
        Err(rejection) => Err(AppError::bad_request(rejection.body_text())),
    };
    match result {
        Ok(resp) => {
            record_outcome("ok");
            Ok(Json(resp))
        }
        Err(e) => {
            record_outcome(e.code);
            if e.is_client_error() {
                debug!(error = %e, "rejected ride parameters");
            } else {
                warn!(error = %e, model = %state.config.model, "fare prediction failed");
            }
            Err(e)
        }
    }
}

/// The only await inside is the prediction call, so running out of request
/// time is an upstream timeout.
async fn predict_within_deadline(
    state: &AppState,
    query: &RideQuery,
) -> Result<FareResponse, AppError> {
    match state.config.request_timeout {
        Some(limit) => tokio::time::timeout(limit, predict(state, query))
            .await
            .unwrap_or_else(|_| {
                Err(AppError::upstream_timeout(format!(
                    "no prediction within {}ms",
                    limit.as_millis()
                )))
            }),
        None => predict(state, query).await,
    }
}

async fn predict(state: &AppState, query: &RideQuery) -> Result<FareResponse, AppError> {
    let cfg = &state.config;
    let stamp = pickup_stamp(chrono::Utc::now(), &cfg.zone, cfg.timestamp_mode);
    let params = RideParams::from_query(query, &cfg.defaults, stamp)?;
    let instance = serde_json::to_value(&params)
        .map_err(|e| AppError::internal(format!("encode instance: {e}")))?;

    let started = Instant::now();
    let result = state.predictor.predict(&cfg.model, vec![instance]).await;
    record_upstream_latency(started.elapsed());

    let fare = first_prediction(result?)?;
    info!(fare = %fare, passengers = params.passenger_count, "fare predicted");
    Ok(FareResponse { fare, params })
}
